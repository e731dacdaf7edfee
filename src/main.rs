use std::rc::Rc;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::Level;

use digilogic::circuit_sim::{Simulation, Ticks, DEFAULT_TICKS};
use digilogic::components::adder::{FullAdder, HalfAdder, RippleAdder};
use digilogic::components::alu::Alu;
use digilogic::components::bus::{Bus, Signed};
use digilogic::components::compare::{Equal, Greater, Less};
use digilogic::components::count::{AtLeastTwo, Tally3};
use digilogic::components::gates::{And, Bridge, Nand, Nor, Not, Or, Xnor, Xor};
use digilogic::components::mux::Mux2;
use digilogic::contact::Role;
use digilogic::design::{input, output, Design};
use digilogic::{Circuit, Options, Result};

#[derive(Parser)]
#[command(name = "digilogic")]
#[command(version, about = "Tick-based digital logic simulator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Ticks to run instead of the circuit's propagation depth
    #[arg(short, long, global = true)]
    ticks: Option<Ticks>,

    /// Log circuit construction and settling
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Drive a catalog design with the given input bits and print its outputs
    Gate {
        design: Catalog,
        /// Input bits as 0 or 1, starting at in1
        #[arg(value_parser = parse_bit)]
        bits: Vec<bool>,
    },

    /// Add two bytes with an 8-bit ripple adder
    Add { a: u8, b: u8 },

    /// Run an 8-bit ALU operation
    Alu { op: AluOp, a: u8, b: u8 },

    /// Print the propagation depth of a catalog design
    Depth { design: Catalog },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Catalog {
    Bridge,
    Not,
    And,
    Or,
    Nand,
    Nor,
    Xor,
    Xnor,
    Mux2,
    HalfAdder,
    FullAdder,
    AtLeastTwo,
    Tally3,
    Adder8,
    Equal8,
    Greater8,
    Less8,
    Alu8,
}

impl Catalog {
    fn design(self) -> Rc<dyn Design> {
        match self {
            Catalog::Bridge => Rc::new(Bridge),
            Catalog::Not => Rc::new(Not),
            Catalog::And => Rc::new(And),
            Catalog::Or => Rc::new(Or),
            Catalog::Nand => Rc::new(Nand),
            Catalog::Nor => Rc::new(Nor),
            Catalog::Xor => Rc::new(Xor),
            Catalog::Xnor => Rc::new(Xnor),
            Catalog::Mux2 => Rc::new(Mux2),
            Catalog::HalfAdder => Rc::new(HalfAdder),
            Catalog::FullAdder => Rc::new(FullAdder),
            Catalog::AtLeastTwo => Rc::new(AtLeastTwo),
            Catalog::Tally3 => Rc::new(Tally3),
            Catalog::Adder8 => Rc::new(RippleAdder::<8>),
            Catalog::Equal8 => Rc::new(Equal::<8>),
            Catalog::Greater8 => Rc::new(Greater::<8>),
            Catalog::Less8 => Rc::new(Less::<8>),
            Catalog::Alu8 => Rc::new(Alu::<8>),
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum AluOp {
    Add,
    Sub,
    And,
    Or,
}

impl AluOp {
    /// `(op1, op0)`
    fn code(self) -> (bool, bool) {
        match self {
            AluOp::Add => (false, false),
            AluOp::Sub => (false, true),
            AluOp::And => (true, false),
            AluOp::Or => (true, true),
        }
    }
}

fn parse_bit(arg: &str) -> std::result::Result<bool, String> {
    match arg {
        "0" | "false" => Ok(false),
        "1" | "true" => Ok(true),
        other => Err(format!("`{other}` is not a bit, expected 0 or 1")),
    }
}

/// Runs either the requested number of ticks or the circuit's depth.
fn run(circuit: Circuit, ticks: Option<Ticks>) -> Simulation {
    let mut sim = Simulation::new(circuit);
    match ticks {
        Some(ticks) => sim.run(ticks),
        None => {
            if sim.run_to_depth().is_none() {
                sim.run(DEFAULT_TICKS);
            }
        }
    }
    sim
}

fn gate(design: Catalog, bits: &[bool], ticks: Option<Ticks>) -> Result<()> {
    let options = bits
        .iter()
        .enumerate()
        .fold(Options::new(), |options, (i, bit)| options.input(input(i + 1), *bit));
    let sim = run(Circuit::build(design.design(), options)?, ticks);
    println!("{} after {} ticks", sim.circuit().name(), sim.elapsed());
    for (name, contact) in sim.circuit().ports().iter() {
        if contact.role() == Role::Output {
            println!("  {name} = {}", contact.get() as u8);
        }
    }
    Ok(())
}

fn add(a: u8, b: u8, ticks: Option<Ticks>) -> Result<()> {
    let options = Bus::<8>::inputs(9).set(Bus::<8>::inputs(1).set(Options::new(), a), b);
    let sim = run(Circuit::new(RippleAdder::<8>, options)?, ticks);
    let sum: u8 = Bus::<8>::outputs(1).read(sim.circuit())?;
    let carry = sim.bit(&output(RippleAdder::<8>::CARRY_OUT)).unwrap_or_default();
    println!("{a} + {b} = {sum} carry {}", carry as u8);
    Ok(())
}

fn alu(op: AluOp, a: u8, b: u8, ticks: Option<Ticks>) -> Result<()> {
    let (op1, op0) = op.code();
    let options = Bus::<8>::inputs(9)
        .set(Bus::<8>::inputs(1).set(Options::new(), a), b)
        .input(input(Alu::<8>::OP0), op0)
        .input(input(Alu::<8>::OP1), op1);
    let sim = run(Circuit::new(Alu::<8>, options)?, ticks);
    let result = Bus::<8>::outputs(1);
    let unsigned: u8 = result.read(sim.circuit())?;
    let signed: i8 = result.read_signed(sim.circuit())?;
    let flag = |port: usize| sim.bit(&output(port)).unwrap_or_default() as u8;
    println!(
        "{op:?} {a} {b} = {unsigned} (signed {signed}) carry {} zero {}",
        flag(Alu::<8>::CARRY),
        flag(Alu::<8>::ZERO)
    );
    Ok(())
}

fn depth(design: Catalog) -> Result<()> {
    let circuit = Circuit::build(design.design(), Options::new())?;
    match circuit.depth() {
        Some(depth) => println!("{}: {depth} ticks", circuit.name()),
        None => println!("{}: wiring loops, no fixed depth", circuit.name()),
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .init();

    match cli.command {
        Commands::Gate { design, bits } => gate(design, &bits, cli.ticks),
        Commands::Add { a, b } => add(a, b, cli.ticks),
        Commands::Alu { op, a, b } => alu(op, a, b, cli.ticks),
        Commands::Depth { design } => depth(design),
    }
}
