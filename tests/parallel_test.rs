use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use naming_convention::{StringConvention, Template, TemplateResolver};
use rayon::prelude::*;

#[test]
fn test_parallel_parsing() {
    // One compiled template shared by every worker
    let template = Template::builder("texture", r"Assets/{project}/T_{name:\pascal}_{index:\d+}")
        .convention(StringConvention::LowerCase)
        .build()
        .expect("Failed to compile template");

    const NUM_PATHS: usize = 1000;
    let paths: Vec<String> = (0..NUM_PATHS)
        .map(|i| {
            if i % 4 == 0 {
                format!("Assets/game/T_broken_{i}")
            } else {
                format!("Assets/game/T_Asset_{i}")
            }
        })
        .collect();

    let sequential_start = Instant::now();
    let sequential: Vec<bool> = paths.iter().map(|path| template.is_match(path)).collect();
    let sequential_duration = sequential_start.elapsed();

    let parallel_start = Instant::now();
    let failures = AtomicUsize::new(0);
    let parallel: Vec<bool> = paths
        .par_iter()
        .map(|path| {
            let matched = template.is_match(path);
            if !matched {
                failures.fetch_add(1, Ordering::Relaxed);
            }
            matched
        })
        .collect();
    let parallel_duration = parallel_start.elapsed();

    println!("Sequential parsing: {NUM_PATHS} paths in {sequential_duration:?}");
    println!("Parallel parsing: {NUM_PATHS} paths in {parallel_duration:?}");

    // Both runs agree path by path
    assert_eq!(sequential, parallel);
    assert_eq!(failures.load(Ordering::Relaxed), NUM_PATHS / 4);
}

#[test]
fn test_resolver_shared_across_threads() {
    let resolver: TemplateResolver = [
        Template::new("texture", "T_{name}").unwrap(),
        Template::new("model", "SM_{name}").unwrap(),
    ]
    .into_iter()
    .collect();

    let names: Vec<String> = (0..100)
        .into_par_iter()
        .map(|i| {
            let input = if i % 2 == 0 { format!("T_{i}") } else { format!("SM_{i}") };
            let (template, _) = resolver.parse_first(&input).expect("Every input should match");
            template.name().to_string()
        })
        .collect();

    assert_eq!(names.iter().filter(|name| *name == "texture").count(), 50);
    assert_eq!(names.iter().filter(|name| *name == "model").count(), 50);
}
