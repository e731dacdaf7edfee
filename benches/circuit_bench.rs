use criterion::{criterion_group, criterion_main, Criterion};
use rand::{RngCore, SeedableRng};

use digilogic::{
    circuit_sim::Simulation,
    components::{adder::RippleAdder, alu::Alu, bus::Bus},
    design::input,
    Circuit, Options,
};

fn operands<const BITS: usize>(a: u64, b: u64) -> Options {
    Bus::<BITS>::inputs(BITS + 1).set(Bus::<BITS>::inputs(1).set(Options::new(), a), b)
}

pub fn adder_bench<const BITS: usize>(c: &mut Criterion) {
    if BITS > 32 {
        panic!("Too large an adder!")
    };
    let mask = (1u64 << BITS) - 1;

    c.bench_function(&format!("{BITS}-bit adder build"), |b| {
        b.iter(|| Circuit::new(RippleAdder::<BITS>, operands::<BITS>(0, 0)))
    });

    let depth = Circuit::new(RippleAdder::<BITS>, Options::new())
        .ok()
        .and_then(|circuit| circuit.depth())
        .unwrap_or_default();
    println!("depth: {depth}");

    c.bench_function(&format!("{BITS}-bit adder"), |b| {
        let mut rng = rand::rngs::StdRng::from_entropy();
        b.iter_batched(
            move || {
                let input = rng.next_u64();
                let options = operands::<BITS>(input & mask, (input >> 32) & mask);
                Simulation::build(RippleAdder::<BITS>, options).unwrap()
            },
            |mut sim| sim.run(depth),
            criterion::BatchSize::SmallInput,
        )
    });
}

fn adder_benches(c: &mut Criterion) {
    adder_bench::<8>(c);
    adder_bench::<16>(c);
    adder_bench::<32>(c);
}

fn alu_benches(c: &mut Criterion) {
    let mut sim = Simulation::build(
        Alu::<8>,
        operands::<8>(100, 42).input(input(Alu::<8>::OP0), true),
    )
    .unwrap();

    c.bench_function("8-bit ALU tick", |b| b.iter(|| sim.tick()));

    println!("ticks: {}", sim.elapsed());
}

criterion_group! {
    name = benches;
    config = Criterion::default();
    targets = adder_benches, alu_benches
}
criterion_main!(benches);
