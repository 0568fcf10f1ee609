use criterion::{black_box, criterion_group, criterion_main, Criterion};

use mathtutor_core::extract;

fn question(i: usize) -> String {
    format!(
        r#"{{"question":"What is {i} + {i}?","options":[{{"id":"a","text":"{a}"}},{{"id":"b","text":"{b}"}},{{"id":"c","text":"{c}"}},{{"id":"d","text":"{d}"}}],"correctAnswer":"b","explanation":"Add {i} to itself.","difficulty":"Easy","subject":"Arithmetic","chapter":"Addition"}}"#,
        a = i,
        b = i * 2,
        c = i * 3,
        d = i + 1,
    )
}

fn bench_extract(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract");

    let five: Vec<String> = (1..=5).map(question).collect();
    let array = format!("[{}]", five.join(","));

    let fenced = format!("Here are your questions:\n\n```json\n{array}\n```\n\nGood luck!");
    let bare = format!("Sure! {array} Let me know if you need more.");
    let wrapped = format!("{{\"questions\": {array}}}");
    let trailing_commas = array.replace("}]", "},]");
    let no_json = "I'm sorry, I can't generate questions for that chapter right now.".repeat(20);

    let large = {
        let many: Vec<String> = (1..=200).map(question).collect();
        format!("```json\n[{}]\n```", many.join(",\n"))
    };

    group.bench_function("fenced", |b| {
        b.iter(|| extract(black_box(&fenced), black_box("Addition")))
    });

    group.bench_function("bare_array", |b| {
        b.iter(|| extract(black_box(&bare), black_box("Addition")))
    });

    group.bench_function("questions_object", |b| {
        b.iter(|| extract(black_box(&wrapped), black_box("Addition")))
    });

    group.bench_function("trailing_commas", |b| {
        b.iter(|| extract(black_box(&trailing_commas), black_box("Addition")))
    });

    group.bench_function("no_json", |b| {
        b.iter(|| extract(black_box(&no_json), black_box("Addition")))
    });

    group.bench_function("large_200", |b| {
        b.iter(|| extract(black_box(&large), black_box("Addition")))
    });

    group.finish();
}

criterion_group!(benches, bench_extract);
criterion_main!(benches);
