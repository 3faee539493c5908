use cdt_core::{MoveType, RngHandle};
use cdt_mcmc::{do_23_move, Metropolis, MetropolisConfig, MoveCommand};
use cdt_triangulation::Manifold;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn bench_single_move(c: &mut Criterion) {
    let manifold = Manifold::new(640, 4).unwrap();
    c.bench_function("do_23_move_640_4", |b| {
        let mut rng = RngHandle::from_seed(7);
        b.iter(|| do_23_move(black_box(&manifold), &mut rng))
    });
}

fn bench_command(c: &mut Criterion) {
    let manifold = Manifold::new(640, 4).unwrap();
    c.bench_function("move_command_ergodic_640_4", |b| {
        b.iter(|| {
            let mut command = MoveCommand::with_seed(&manifold, 11);
            for move_type in MoveType::ERGODIC {
                command.enqueue(move_type);
            }
            command.execute();
            black_box(command.get_succeeded().total())
        })
    });
}

fn bench_pass(c: &mut Criterion) {
    let manifold = Manifold::new(200, 3).unwrap();
    let mut group = c.benchmark_group("metropolis");
    group.sample_size(10);
    group.bench_function("one_pass_200_3", |b| {
        b.iter(|| {
            let mut engine = Metropolis::new(MetropolisConfig::new(0.6, 1.1, 0.1, 1, 0)).unwrap();
            engine.run(black_box(&manifold)).unwrap()
        })
    });
    group.finish();
}

criterion_group!(benches, bench_single_move, bench_command, bench_pass);
criterion_main!(benches);
