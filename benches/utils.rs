use rand::{Rng, SeedableRng, rngs::StdRng};
use tilelate::{Context, Value};

/// Generate n random tile-grid contexts to use in the benchmark
pub fn generate_random_contexts(n: usize) -> Vec<Context> {
    let mut rng = StdRng::seed_from_u64(42); // Fixed seed for reproducibility
    let mut contexts = Vec::with_capacity(n);

    for _ in 0..n {
        let column_count = rng.random_range(1..5);
        let mut columns: Vec<Value> = Vec::with_capacity(column_count);
        for _ in 0..column_count {
            let tile_count = rng.random_range(0..8);
            let mut tiles: Vec<Value> = Vec::with_capacity(tile_count);
            for _ in 0..tile_count {
                let text = random_string(&mut rng, 3, 10);
                let size = if rng.random_bool(0.3) { "2x2" } else { "1x1" };
                tiles.push(
                    Context::new()
                        .insert("url", format!("https://{text}.example"))
                        .insert("text", text)
                        .insert("size", size)
                        .insert("clicks", rng.random_range(0..500))
                        .to_owned()
                        .into(),
                );
            }
            columns.push(
                Context::new()
                    .insert("tiles", tiles)
                    .insert("editMode", rng.random_bool(0.2))
                    .to_owned()
                    .into(),
            );
        }

        contexts.push(
            Context::new()
                .insert("columns", columns)
                .insert("year", rng.random_range(2000..2100))
                .to_owned(),
        );
    }

    contexts
}

/// Generate a random lowercase string with length between min and max
fn random_string(rng: &mut StdRng, min_len: usize, max_len: usize) -> String {
    let len = rng.random_range(min_len..=max_len);
    (0..len).map(|_| rng.random_range(b'a'..=b'z') as char).collect()
}

// Print binary size information - can be used from individual benchmarks
pub fn print_binary_size() {
    let binary_path = std::env::current_exe().unwrap();
    let size_bytes = std::fs::metadata(&binary_path).unwrap().len();
    let size_kb = size_bytes as f64 / 1024.0;

    println!("Binary size: {size_kb:.2} KB ({size_bytes} bytes)");
    println!("Binary path: {}", binary_path.display());
}
