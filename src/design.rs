//! Type-level descriptions of components.
//!
//! A [`Design`] says what a component is made of and how its parts are wired.
//! It holds no signal state; every [`Circuit`](crate::Circuit) built from it
//! gets its own elements, contacts and nets.

use std::rc::Rc;

use crate::circuit::Ports;

/// A named reference to a contact, as seen from inside a design.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Pin {
    /// A port of one of the design's elements.
    Element { element: String, port: String },
    /// One of the design's own ports.
    Own(String),
}

pub fn pin(element: impl Into<String>, port: impl Into<String>) -> Pin {
    Pin::Element {
        element: element.into(),
        port: port.into(),
    }
}

pub fn own(port: impl Into<String>) -> Pin {
    Pin::Own(port.into())
}

/// A port of a design, either backed by a fresh contact or aliasing a
/// contact of one of the elements.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PortDecl {
    pub name: String,
    pub alias: Option<Pin>,
}

pub fn port(name: impl Into<String>) -> PortDecl {
    PortDecl {
        name: name.into(),
        alias: None,
    }
}

impl PortDecl {
    pub fn to(self, element: impl Into<String>, port: impl Into<String>) -> Self {
        PortDecl {
            alias: Some(pin(element, port)),
            ..self
        }
    }
}

/// A batch of elements sharing one design.
#[derive(Clone)]
pub struct Element {
    pub design: Rc<dyn Design>,
    pub names: Vec<String>,
}

impl Element {
    pub fn new<D: Design + 'static>(design: D, names: &[&str]) -> Self {
        Self::shared(Rc::new(design), names.iter().map(|name| name.to_string()))
    }

    pub fn shared(design: Rc<dyn Design>, names: impl IntoIterator<Item = String>) -> Self {
        Element {
            design,
            names: names.into_iter().collect(),
        }
    }

    /// `count` elements named `prefix1`, `prefix2`, ...
    pub fn numbered<D: Design + 'static>(design: D, prefix: &str, count: usize) -> Self {
        Self::shared(Rc::new(design), (1..=count).map(|i| format!("{prefix}{i}")))
    }
}

/// Wires of a design, each a set of pins carrying one signal.
pub type Netlist = Vec<Vec<Pin>>;

pub trait Design {
    fn name(&self) -> &'static str;

    fn elements(&self) -> Vec<Element> {
        Vec::new()
    }

    fn inout(&self) -> Vec<PortDecl>;

    fn connect(&self) -> Netlist {
        Vec::new()
    }

    /// Computes outputs from inputs. Only called on designs without
    /// elements, after their ports have been refreshed.
    fn evaluate(&self, _ports: &Ports) {}
}

pub fn input(i: usize) -> String {
    format!("in{i}")
}

pub fn output(i: usize) -> String {
    format!("out{i}")
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn port_helpers() {
        assert_eq!(port("in1").alias, None);
        assert_eq!(
            port("in2").to("a1", "in1").alias,
            Some(Pin::Element {
                element: "a1".to_string(),
                port: "in1".to_string()
            })
        );
        assert_eq!(input(3), "in3");
        assert_eq!(output(10), "out10");
    }

    struct Empty;

    impl Design for Empty {
        fn name(&self) -> &'static str {
            "EMPTY"
        }

        fn inout(&self) -> Vec<PortDecl> {
            vec![]
        }
    }

    #[test]
    fn numbered_elements() {
        let element = Element::numbered(Empty, "b", 3);
        assert_eq!(element.names, ["b1", "b2", "b3"]);
        assert_eq!(element.design.name(), "EMPTY");
    }
}
