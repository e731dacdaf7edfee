use crate::contact::{Contact, Role};

/// Why a set of contacts cannot form a net.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NetDefect {
    NoDriver,
    MultipleDrivers(usize),
    NoReceivers,
}

/// A wire: one driving output and the inputs that follow it.
#[derive(Debug)]
pub struct Net {
    driver: Contact,
    receivers: Vec<Contact>,
}

impl Net {
    /// Builds a net from an unordered set of contacts. Exactly one of them
    /// must be an output. Listing the same contact twice is harmless.
    pub fn new(members: Vec<Contact>) -> Result<Self, NetDefect> {
        let mut unique: Vec<Contact> = Vec::with_capacity(members.len());
        for contact in members {
            if !unique.iter().any(|seen| seen.same(&contact)) {
                unique.push(contact);
            }
        }
        let (mut drivers, receivers): (Vec<_>, Vec<_>) = unique
            .into_iter()
            .partition(|contact| contact.role() == Role::Output);
        match drivers.len() {
            0 => return Err(NetDefect::NoDriver),
            1 => (),
            n => return Err(NetDefect::MultipleDrivers(n)),
        }
        if receivers.is_empty() {
            return Err(NetDefect::NoReceivers);
        }
        Ok(Net {
            driver: drivers.remove(0),
            receivers,
        })
    }

    pub fn propagate(&self) {
        let val = self.driver.get();
        for receiver in &self.receivers {
            receiver.set(val);
        }
    }

    pub fn driver(&self) -> &Contact {
        &self.driver
    }

    pub fn receivers(&self) -> &[Contact] {
        &self.receivers
    }
}

#[cfg(test)]
mod test {
    use super::{Net, NetDefect};
    use crate::contact::{Contact, Role};

    #[test]
    fn driver_position_is_irrelevant() {
        let a = Contact::new(Role::Input);
        let b = Contact::new(Role::Input);
        let out = Contact::new(Role::Output);
        out.set(true);
        let net = Net::new(vec![a.clone(), out.clone(), b.clone()]).unwrap();
        assert!(net.driver().same(&out));
        net.propagate();
        assert!(a.get() && b.get());

        out.set(false);
        net.propagate();
        net.propagate();
        assert!(!a.get() && !b.get());
    }

    #[test]
    fn malformed_nets() {
        let input = || Contact::new(Role::Input);
        let output = || Contact::new(Role::Output);
        assert_eq!(
            Net::new(vec![input(), input()]).unwrap_err(),
            NetDefect::NoDriver
        );
        assert_eq!(
            Net::new(vec![output(), output(), input()]).unwrap_err(),
            NetDefect::MultipleDrivers(2)
        );
        assert_eq!(
            Net::new(vec![output()]).unwrap_err(),
            NetDefect::NoReceivers
        );
        assert_eq!(Net::new(vec![]).unwrap_err(), NetDefect::NoDriver);
    }

    #[test]
    fn repeated_members_collapse() {
        let out = Contact::new(Role::Output);
        let a = Contact::new(Role::Input);
        let net = Net::new(vec![out.clone(), a.clone(), out, a]).unwrap();
        assert_eq!(net.receivers().len(), 1);
    }
}
