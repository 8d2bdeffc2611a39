use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use lennard_jones::{DirectSummation, Particles, Simulation, Sorting};
use rand::{rngs::StdRng, SeedableRng};

const BOX_RADIUS: f64 = 20.;

fn lattice(n: usize) -> Particles {
    let mut rng = StdRng::seed_from_u64(0);
    Particles::lattice(n, BOX_RADIUS, 1., &mut rng)
}

fn direct_summation(c: &mut Criterion) {
    let solvers = [
        ("scalar", DirectSummation::new()),
        ("simd", DirectSummation::new().simd()),
        ("scalar multithreaded", DirectSummation::new().multithreaded(4)),
        ("simd multithreaded", DirectSummation::new().simd().multithreaded(4)),
        ("scalar rayon iter", DirectSummation::new().rayon_iter()),
        ("scalar rayon pool", DirectSummation::new().rayon_pool()),
        ("simd rayon pool", DirectSummation::new().simd().rayon_pool()),
    ];

    let mut group = c.benchmark_group("direct summation");
    for n_par in [200, 800, 3_200] {
        let particles = lattice(n_par);

        for (name, solver) in solvers {
            group.bench_with_input(BenchmarkId::new(name, n_par), &n_par, |b, _| {
                b.iter_batched_ref(
                    || Simulation::new(particles.clone(), solver, BOX_RADIUS),
                    |sim| sim.simulate(1e-3, 10),
                    BatchSize::SmallInput,
                )
            });
        }
    }
}

fn sorting(c: &mut Criterion) {
    let particles = lattice(800);

    let mut group = c.benchmark_group("sorting");
    for every in [1, 10, 100] {
        group.bench_with_input(BenchmarkId::new("every", every), &every, |b, &every| {
            b.iter_batched_ref(
                || {
                    Simulation::new(particles.clone(), DirectSummation::new().rayon_pool(), BOX_RADIUS)
                        .sorting(Sorting::EveryNIteration(every))
                },
                |sim| sim.simulate(1e-3, 10),
                BatchSize::SmallInput,
            )
        });
    }
}

criterion_group!(benches, direct_summation, sorting,);
criterion_main!(benches);
