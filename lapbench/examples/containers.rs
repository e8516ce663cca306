//! Example benchmark suite
//!
//! Interchangeable payload routines (strings, vectors, maps, numerics)
//! registered against the engine, plus a minimal reporter that serializes
//! the finished suite to JSON on stdout.
//!
//! Run with:
//!   cargo run --release --example containers

use lapbench::prelude::*;
use std::collections::BTreeMap;

/// Deterministic value scrambler so fixtures need no RNG.
fn scramble(i: u64) -> u64 {
    i.wrapping_mul(0x9E37_79B9_7F4A_7C15).rotate_left(17)
}

fn build_values(n: usize) -> Vec<i64> {
    (0..n as u64).map(|i| (scramble(i) % n.max(1) as u64) as i64).collect()
}

// ============================================================================
// Numerics
// ============================================================================

fn register_numerics(registry: &mut Registry) -> Result<(), ConfigError> {
    registry.register(
        CaseSpec::new("pow_of_two_bit_shift", |b| {
            let shift = (b.arg(0) - 1) as u32 % 63;
            let z = 1i64;
            while b.keep_running() {
                black_box(z << shift);
            }
            b.set_input_size(b.arg(0) as u64);
        })
        .range_multiplier(2)
        .range(4, 64)
        .complexity(Complexity::Class(ComplexityClass::Constant)),
    )?;

    registry.register(
        CaseSpec::new("int_to_string", |b| {
            let value = 10i64.pow((b.arg(0) as u32).min(9));
            while b.keep_running() {
                black_box(value.to_string());
            }
            b.set_input_size(b.arg(0) as u64);
        })
        .range_multiplier(2)
        .range(1, 8)
        .complexity(Complexity::Class(ComplexityClass::Constant)),
    )?;

    Ok(())
}

// ============================================================================
// Strings
// ============================================================================

fn register_strings(registry: &mut Registry) -> Result<(), ConfigError> {
    registry.register(
        CaseSpec::new("string_copy", |b| {
            let n = b.arg(0) as usize;
            let s = "-".repeat(n);
            while b.keep_running() {
                black_box(s.clone());
            }
            b.set_input_size(n as u64);
            b.set_bytes_processed(b.iterations() * n as u64);
        })
        .range_multiplier(2)
        .range(1 << 10, 1 << 18)
        .complexity(Complexity::Class(ComplexityClass::Linear)),
    )?;

    registry.register(
        CaseSpec::new("string_compare", |b| {
            let n = b.arg(0) as usize;
            let s1 = "-".repeat(n);
            let s2 = "-".repeat(n);
            while b.keep_running() {
                black_box(s1.cmp(&s2));
            }
            b.set_input_size(n as u64);
        })
        .range_multiplier(2)
        .range(1 << 10, 1 << 18)
        .complexity(Complexity::Class(ComplexityClass::Linear)),
    )?;

    registry.register(
        CaseSpec::new("string_concatenate", |b| {
            let n = b.arg(0) as usize;
            let s1 = "-".repeat(n);
            let s2 = "-".repeat(n);
            while b.keep_running() {
                black_box(format!("{s1}{s2}"));
            }
            b.set_input_size(n as u64);
        })
        .range_multiplier(2)
        .range(1 << 10, 1 << 18)
        .complexity(Complexity::Auto),
    )?;

    Ok(())
}

// ============================================================================
// Vectors
// ============================================================================

/// Per-run vector state: built in set-up, released in tear-down, never
/// inside the timed window.
#[derive(Default)]
struct VectorFixture {
    values: Vec<i64>,
}

impl VectorFixture {
    fn n(&self) -> i64 {
        self.values.len() as i64
    }
}

struct VectorFind(VectorFixture);

impl FixtureCase for VectorFind {
    fn set_up(&mut self, args: &lapbench::Args) -> Result<(), String> {
        let n = args.get(0).ok_or("vector cases need a size argument")? as usize;
        self.0.values = build_values(n);
        Ok(())
    }

    fn bench(&mut self, b: &mut Bencher) {
        // Worst case: the needle is never present.
        let needle = self.0.n() * 2;
        while b.keep_running() {
            black_box(self.0.values.iter().position(|&v| v == needle));
        }
        b.set_input_size(self.0.n() as u64);
    }

    fn tear_down(&mut self) {
        self.0.values.clear();
    }
}

struct VectorSort(VectorFixture);

impl FixtureCase for VectorSort {
    fn set_up(&mut self, args: &lapbench::Args) -> Result<(), String> {
        let n = args.get(0).ok_or("vector cases need a size argument")? as usize;
        self.0.values = build_values(n);
        Ok(())
    }

    fn bench(&mut self, b: &mut Bencher) {
        while b.keep_running() {
            self.0.values.sort_unstable();
            black_box(self.0.values.first());
        }
        b.set_input_size(self.0.n() as u64);
    }

    fn tear_down(&mut self) {
        self.0.values.clear();
    }
}

fn register_vectors(registry: &mut Registry) -> Result<(), ConfigError> {
    registry.register(
        CaseSpec::fixture("vector_find", VectorFind(VectorFixture::default()))
            .range_multiplier(2)
            .range(1 << 10, 1 << 16)
            .complexity(Complexity::Class(ComplexityClass::Linear)),
    )?;

    registry.register(
        CaseSpec::fixture("vector_sort", VectorSort(VectorFixture::default()))
            .range_multiplier(2)
            .range(1 << 10, 1 << 16)
            .complexity(Complexity::Class(ComplexityClass::Linearithmic)),
    )?;

    // One registration shape shared across element types; the engine only
    // ever sees the control object.
    register_sequential_push(registry, "vector_push_sequential_i32", 42i32)?;
    register_sequential_push(registry, "vector_push_sequential_u64", 42u64)?;

    Ok(())
}

/// Sequential-fill benchmark parametrized over the element type.
fn register_sequential_push<T>(
    registry: &mut Registry,
    name: &str,
    value: T,
) -> Result<(), ConfigError>
where
    T: Clone + 'static,
{
    registry.register(
        CaseSpec::new(name, move |b| {
            let n = b.arg(0) as usize;
            while b.keep_running() {
                // No pre-reservation: reallocation on push is part of what
                // this case measures.
                let mut v = Vec::new();
                for _ in 0..n {
                    v.push(value.clone());
                }
                black_box(v.len());
            }
            b.set_input_size(n as u64);
            let items = b.iterations() * n as u64;
            b.set_items_processed(items);
            b.set_bytes_processed(items * std::mem::size_of::<T>() as u64);
        })
        .range_multiplier(2)
        .range(1 << 10, 1 << 16)
        .complexity(Complexity::Auto),
    )
}

// ============================================================================
// Maps
// ============================================================================

fn register_maps(registry: &mut Registry) -> Result<(), ConfigError> {
    registry.register(
        CaseSpec::new("map_insert_sequential", |b| {
            let n = b.arg(0);
            while b.keep_running() {
                let mut m = BTreeMap::new();
                for i in 0..n {
                    m.insert(scramble(i as u64) as i64, i);
                }
                black_box(m.len());
            }
            b.set_input_size(n as u64);
            b.set_items_processed(b.iterations() * n as u64);
        })
        .range_multiplier(4)
        .range(1 << 10, 1 << 14)
        .complexity(Complexity::Class(ComplexityClass::Linearithmic)),
    )?;

    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter("lapbench=info")
        .init();

    let mut registry = Registry::new();
    register_numerics(&mut registry)?;
    register_strings(&mut registry)?;
    register_vectors(&mut registry)?;
    register_maps(&mut registry)?;

    let mut suite = registry.seal();

    // 10ms per run keeps the demo suite under a minute end to end.
    let executor = Executor::new(EngineConfig {
        min_run_time_ns: 10_000_000,
        ..Default::default()
    });
    let report = executor.run(&mut suite);

    // This binary plays the reporter: dump the suite as JSON.
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
