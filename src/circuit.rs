use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::ops::Index;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::circuit_sim::Ticks;
use crate::contact::{Contact, Probe, Role};
use crate::design::{Design, Element, Pin, PortDecl};
use crate::error::{CircuitError, Result};
use crate::net::{Net, NetDefect};

/// What a circuit does with one of its ports on every tick.
#[derive(Clone, Debug)]
pub enum Forced {
    /// Hold an input at this value.
    Constant(bool),
    /// Copy an output into this probe.
    Probe(Probe),
}

/// Construction options: port name to forced constant or probe.
///
/// Options are kept for the whole life of the circuit and applied at the
/// start of every tick.
#[derive(Clone, Debug, Default)]
pub struct Options(BTreeMap<String, Forced>);

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(mut self, port: impl Into<String>, val: bool) -> Self {
        self.insert(port, Forced::Constant(val));
        self
    }

    pub fn probe(mut self, port: impl Into<String>, probe: &Probe) -> Self {
        self.insert(port, Forced::Probe(probe.clone()));
        self
    }

    pub fn insert(&mut self, port: impl Into<String>, forced: Forced) {
        self.0.insert(port.into(), forced);
    }

    pub fn get(&self, port: &str) -> Option<&Forced> {
        self.0.get(port)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The named ports of a circuit, in declaration order.
#[derive(Clone, Debug, Default)]
pub struct Ports(Vec<(String, Contact)>);

impl Ports {
    pub fn get(&self, name: &str) -> Option<&Contact> {
        self.0
            .iter()
            .find(|(port, _)| port == name)
            .map(|(_, contact)| contact)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Contact)> {
        self.0.iter().map(|(name, contact)| (name.as_str(), contact))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Index<&str> for Ports {
    type Output = Contact;

    fn index(&self, name: &str) -> &Contact {
        match self.get(name) {
            Some(contact) => contact,
            None => panic!("no port named `{name}`"),
        }
    }
}

/// A live instance of a [`Design`].
pub struct Circuit {
    design: Rc<dyn Design>,
    elements: Vec<(String, Circuit)>,
    ports: Ports,
    nets: Vec<Net>,
    owned_inputs: Vec<Contact>,
    forced: Vec<(Contact, Forced)>,
}

fn resolve(
    circuit: &'static str,
    elements: &[(String, Circuit)],
    ports: &Ports,
    pin: &Pin,
) -> Result<Contact> {
    match pin {
        Pin::Element { element, port } => {
            let (_, child) = elements
                .iter()
                .find(|(name, _)| name == element)
                .ok_or_else(|| CircuitError::UnknownElement {
                    circuit,
                    element: element.clone(),
                })?;
            child
                .port(port)
                .cloned()
                .ok_or_else(|| CircuitError::UnknownPort {
                    circuit,
                    target: element.clone(),
                    port: port.clone(),
                })
        }
        Pin::Own(port) => ports
            .get(port)
            .cloned()
            .ok_or_else(|| CircuitError::UnknownPort {
                circuit,
                target: circuit.to_string(),
                port: port.clone(),
            }),
    }
}

impl Circuit {
    pub fn new<D: Design + 'static>(design: D, options: Options) -> Result<Self> {
        Self::build(Rc::new(design), options)
    }

    pub fn build(design: Rc<dyn Design>, options: Options) -> Result<Self> {
        let name = design.name();
        match Self::assemble(design, options) {
            Ok(circuit) => {
                trace!(
                    target: "digilogic::circuit",
                    circuit = name,
                    elements = circuit.elements.len(),
                    ports = circuit.ports.len(),
                    nets = circuit.nets.len(),
                    "circuit built"
                );
                Ok(circuit)
            }
            Err(err) => {
                debug!(target: "digilogic::circuit", circuit = name, error = %err, "circuit rejected");
                Err(err)
            }
        }
    }

    fn assemble(design: Rc<dyn Design>, options: Options) -> Result<Self> {
        let circuit = design.name();

        let mut elements: Vec<(String, Circuit)> = Vec::new();
        for Element { design: child, names } in design.elements() {
            for element in names {
                if elements.iter().any(|(name, _)| *name == element) {
                    return Err(CircuitError::DuplicateElement { circuit, element });
                }
                let built = Circuit::build(child.clone(), Options::default()).map_err(|source| {
                    CircuitError::Element {
                        circuit,
                        element: element.clone(),
                        source: Box::new(source),
                    }
                })?;
                elements.push((element, built));
            }
        }

        let mut ports = Ports::default();
        let mut owned_inputs = Vec::new();
        for PortDecl { name, alias } in design.inout() {
            let role = Role::of_port(&name).ok_or_else(|| CircuitError::BadPortName {
                circuit,
                port: name.clone(),
            })?;
            if ports.get(&name).is_some() {
                return Err(CircuitError::DuplicatePort { circuit, port: name });
            }
            let contact = match alias {
                Some(pin) => {
                    let contact = resolve(circuit, &elements, &ports, &pin)?;
                    if contact.role() != role {
                        return Err(CircuitError::RoleMismatch { circuit, port: name });
                    }
                    contact
                }
                None => {
                    let contact = Contact::new(role);
                    if role == Role::Input {
                        owned_inputs.push(contact.clone());
                    }
                    contact
                }
            };
            ports.0.push((name, contact));
        }

        let mut nets = Vec::new();
        for (net, pins) in design.connect().iter().enumerate() {
            let members = pins
                .iter()
                .map(|pin| resolve(circuit, &elements, &ports, pin))
                .collect::<Result<Vec<_>>>()?;
            let net = Net::new(members).map_err(|defect| match defect {
                NetDefect::NoDriver => CircuitError::NoDriver { circuit, net },
                NetDefect::MultipleDrivers(drivers) => CircuitError::MultipleDrivers {
                    circuit,
                    net,
                    drivers,
                },
                NetDefect::NoReceivers => CircuitError::NoReceivers { circuit, net },
            })?;
            nets.push(net);
        }

        let mut forced = Vec::with_capacity(options.len());
        for (port, value) in options.0 {
            let role = Role::of_port(&port).ok_or_else(|| CircuitError::BadPortName {
                circuit,
                port: port.clone(),
            })?;
            let contact = match ports.get(&port) {
                Some(contact) => contact.clone(),
                None => {
                    return Err(CircuitError::UnknownPort {
                        circuit,
                        target: circuit.to_string(),
                        port,
                    })
                }
            };
            match (&value, role) {
                (Forced::Constant(val), Role::Input) => {
                    if owned_inputs.iter().any(|owned| owned.same(&contact)) {
                        contact.latch(*val);
                    }
                }
                (Forced::Probe(_), Role::Output) => (),
                _ => return Err(CircuitError::ForcedMismatch { circuit, port }),
            }
            forced.push((contact, value));
        }

        Ok(Circuit {
            design,
            elements,
            ports,
            nets,
            owned_inputs,
            forced,
        })
    }

    /// Advances this circuit and everything below it by one tick.
    pub fn update(&self) {
        for (contact, forced) in &self.forced {
            match forced {
                Forced::Constant(val) => contact.set(*val),
                Forced::Probe(probe) => probe.record(contact.get()),
            }
        }
        for (_, element) in &self.elements {
            element.update();
        }
        for net in &self.nets {
            net.propagate();
        }
        for input in &self.owned_inputs {
            input.refresh();
        }
        if self.elements.is_empty() {
            self.design.evaluate(&self.ports);
        }
    }

    pub fn name(&self) -> &'static str {
        self.design.name()
    }

    pub fn ports(&self) -> &Ports {
        &self.ports
    }

    pub fn port(&self, name: &str) -> Option<&Contact> {
        self.ports.get(name)
    }

    pub fn bit(&self, name: &str) -> Option<bool> {
        self.port(name).map(Contact::get)
    }

    pub fn element(&self, name: &str) -> Option<&Circuit> {
        self.elements
            .iter()
            .find(|(element, _)| element == name)
            .map(|(_, circuit)| circuit)
    }

    pub fn elements(&self) -> impl Iterator<Item = (&str, &Circuit)> {
        self.elements
            .iter()
            .map(|(name, circuit)| (name.as_str(), circuit))
    }

    pub fn nets(&self) -> &[Net] {
        &self.nets
    }

    /// Finds a contact by dotted path, e.g. `"h1.x1.out1"`.
    pub fn lookup(&self, path: &str) -> Option<&Contact> {
        match path.split_once('.') {
            Some((element, rest)) => self.element(element)?.lookup(rest),
            None => self.port(path),
        }
    }

    /// Every contact value in the subtree, in a fixed order.
    pub fn snapshot(&self) -> Vec<bool> {
        let mut bits = Vec::new();
        self.collect_bits(&mut bits);
        bits
    }

    fn collect_bits(&self, bits: &mut Vec<bool>) {
        bits.extend(self.ports.iter().map(|(_, contact)| contact.get()));
        for (_, element) in &self.elements {
            element.collect_bits(bits);
        }
    }

    /// Number of ticks after which every contact holds its steady value,
    /// given inputs held constant from the first tick. `None` if the wiring
    /// has a loop.
    pub fn depth(&self) -> Option<Ticks> {
        let mut graph = DepthGraph::default();
        self.collect_edges(&mut graph);
        graph.depth()
    }

    fn collect_edges(&self, graph: &mut DepthGraph) {
        for (_, contact) in self.ports.iter() {
            graph.node(contact);
        }
        if self.elements.is_empty() {
            let inputs: Vec<usize> = self
                .ports
                .iter()
                .filter(|(_, contact)| contact.role() == Role::Input)
                .map(|(_, contact)| contact.id())
                .collect();
            for (_, contact) in self.ports.iter() {
                if contact.role() == Role::Output {
                    let node = graph.node(contact);
                    node.base = 1;
                    node.preds.extend(inputs.iter().copied());
                }
            }
        }
        for net in &self.nets {
            let driver = net.driver().id();
            for receiver in net.receivers() {
                graph.node(receiver).preds.push(driver);
            }
        }
        for (_, element) in &self.elements {
            element.collect_edges(graph);
        }
    }
}

impl fmt::Debug for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Circuit")
            .field("name", &self.name())
            .field(
                "elements",
                &self.elements.iter().map(|(name, _)| name).collect::<Vec<_>>(),
            )
            .field("ports", &self.ports)
            .field("nets", &self.nets.len())
            .finish()
    }
}

#[derive(Default)]
struct DepthNode {
    base: Ticks,
    preds: Vec<usize>,
}

#[derive(Default)]
struct DepthGraph {
    nodes: HashMap<usize, DepthNode>,
}

enum Mark {
    Visiting,
    Done(Ticks),
}

impl DepthGraph {
    fn node(&mut self, contact: &Contact) -> &mut DepthNode {
        self.nodes.entry(contact.id()).or_default()
    }

    fn arrival(&self, id: usize, marks: &mut HashMap<usize, Mark>) -> Option<Ticks> {
        match marks.get(&id) {
            Some(Mark::Done(ticks)) => return Some(*ticks),
            Some(Mark::Visiting) => return None,
            None => (),
        }
        marks.insert(id, Mark::Visiting);
        let (base, preds) = match self.nodes.get(&id) {
            Some(node) => (node.base, node.preds.as_slice()),
            None => (0, &[][..]),
        };
        let mut latest = 0;
        for pred in preds {
            latest = latest.max(self.arrival(*pred, marks)?);
        }
        let ticks = base + latest;
        marks.insert(id, Mark::Done(ticks));
        Some(ticks)
    }

    fn depth(&self) -> Option<Ticks> {
        let mut marks = HashMap::new();
        let mut depth = 0;
        for id in self.nodes.keys() {
            depth = depth.max(self.arrival(*id, &mut marks)?);
        }
        Some(depth)
    }
}
