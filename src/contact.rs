use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// Which side of a component a contact sits on.
///
/// Inputs are driven from outside the component (by a forced option or by a
/// net of the enclosing circuit). Outputs are written by leaf evaluation and
/// are what nets read from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    Input,
    Output,
}

impl Role {
    /// Derives the role from a port name, `None` if the name is malformed.
    pub fn of_port(name: &str) -> Option<Role> {
        if name.starts_with("in") {
            Some(Role::Input)
        } else if name.starts_with("out") {
            Some(Role::Output)
        } else {
            None
        }
    }
}

struct ContactCell {
    role: Role,
    value: Cell<bool>,
    latch: Cell<Option<bool>>,
}

/// A single-bit signal holder.
///
/// Cloning a contact yields another handle to the same bit, which is how a
/// circuit exposes one of its elements' contacts as its own port.
#[derive(Clone)]
pub struct Contact(Rc<ContactCell>);

impl Contact {
    pub fn new(role: Role) -> Self {
        Contact(Rc::new(ContactCell {
            role,
            value: Cell::new(false),
            latch: Cell::new(None),
        }))
    }

    pub fn role(&self) -> Role {
        self.0.role
    }

    pub fn get(&self) -> bool {
        self.0.value.get()
    }

    pub fn set(&self, val: bool) {
        self.0.value.set(val);
    }

    /// Remembers a constant that [`Contact::refresh`] puts back each tick.
    pub(crate) fn latch(&self, val: bool) {
        self.0.latch.set(Some(val));
    }

    /// Re-applies the latched constant, if any.
    pub fn refresh(&self) {
        if let Some(val) = self.0.latch.get() {
            self.0.value.set(val);
        }
    }

    /// True if both handles refer to the same bit.
    pub fn same(&self, other: &Contact) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn id(&self) -> usize {
        Rc::as_ptr(&self.0) as usize
    }
}

impl fmt::Debug for Contact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Contact")
            .field("role", &self.role())
            .field("value", &self.get())
            .finish()
    }
}

/// An observer for an output port, handed to a circuit through its options.
///
/// The circuit copies the port's value into the probe at the start of every
/// tick, so after a tick the probe holds the value the port had before it.
#[derive(Clone, Debug)]
pub struct Probe(Contact);

impl Probe {
    pub fn new() -> Self {
        Probe(Contact::new(Role::Input))
    }

    pub fn get(&self) -> bool {
        self.0.get()
    }

    pub(crate) fn record(&self, val: bool) {
        self.0.set(val);
    }
}

impl Default for Probe {
    fn default() -> Self {
        Self::new()
    }
}
