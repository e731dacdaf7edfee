/// Errors raised while building a [`Circuit`](crate::Circuit).
///
/// All of these point at a mistake in a [`Design`](crate::design::Design) or in
/// the [`Options`](crate::Options) handed to it. None of them can happen once a
/// circuit has been built.
#[derive(Debug, thiserror::Error)]
pub enum CircuitError {
    #[error("{circuit}: port `{port}` must start with `in` or `out`")]
    BadPortName { circuit: &'static str, port: String },

    #[error("{circuit}: port `{port}` declared twice")]
    DuplicatePort { circuit: &'static str, port: String },

    #[error("{circuit}: element `{element}` declared twice")]
    DuplicateElement {
        circuit: &'static str,
        element: String,
    },

    #[error("{circuit}: no element named `{element}`")]
    UnknownElement {
        circuit: &'static str,
        element: String,
    },

    #[error("{circuit}: `{target}` has no port named `{port}`")]
    UnknownPort {
        circuit: &'static str,
        target: String,
        port: String,
    },

    #[error("{circuit}: port `{port}` aliases a contact of the opposite role")]
    RoleMismatch { circuit: &'static str, port: String },

    #[error("{circuit}: option `{port}` must be a constant for inputs and a probe for outputs")]
    ForcedMismatch { circuit: &'static str, port: String },

    #[error("{circuit}: net #{net} has no driving output")]
    NoDriver { circuit: &'static str, net: usize },

    #[error("{circuit}: net #{net} is driven by {drivers} outputs")]
    MultipleDrivers {
        circuit: &'static str,
        net: usize,
        drivers: usize,
    },

    #[error("{circuit}: net #{net} drives nothing")]
    NoReceivers { circuit: &'static str, net: usize },

    #[error("{circuit}: element `{element}` failed to build")]
    Element {
        circuit: &'static str,
        element: String,
        #[source]
        source: Box<CircuitError>,
    },
}

impl CircuitError {
    /// Follows nested [`CircuitError::Element`] wrappers down to the
    /// declaration that actually failed.
    pub fn root_cause(&self) -> &CircuitError {
        match self {
            CircuitError::Element { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

pub type Result<T, E = CircuitError> = std::result::Result<T, E>;
