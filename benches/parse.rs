use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};

use bibdb::{Parser, Pos, Reporter, tex_to_unicode, title_case};

fn sample_bibliography(entries: usize) -> String {
    let mut out = String::from("@string{jgr = \"J. Geophys. Res.\"}\n\n");
    for i in 0..entries {
        let month = ["jan", "apr", "jul", "oct"][i % 4];
        out.push_str(&format!(
            "@article{{key{i},\n  \
               author = {{Writer, W. and de la Happ{{\\'e}}, Andr{{\\'e}} and {{Some Institute}}}},\n  \
               title = {{The {{TCP/IP}} Guide to Volume {i}: A Study}},\n  \
               journal = jgr,\n  \
               month = {month},\n  \
               year = 19{:02},\n}}\n\n",
            i % 100
        ));
    }
    out
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let input = sample_bibliography(500);

    c.bench_function("parse 500 entries", |b| {
        b.iter(|| {
            let mut rpt = Reporter::new();
            let mut parser = Parser::new();
            parser.parse(black_box(&input), "bench.bib", &mut rpt);
            parser.finalize(&rpt)
        })
    });

    let mut rpt = Reporter::new();
    let mut parser = Parser::new();
    parser.parse(&input, "bench.bib", &mut rpt);
    let db = parser.finalize(&rpt).expect("bench input parses cleanly");

    c.bench_function("split author names", |b| {
        b.iter(|| {
            let mut rpt = Reporter::new();
            for entry in &db {
                black_box(entry.authors(&mut rpt));
            }
        })
    });

    c.bench_function("title case", |b| {
        let pos = Pos::unknown();
        b.iter(|| {
            let mut rpt = Reporter::new();
            for entry in &db {
                if let Some(title) = entry.get("title") {
                    black_box(title_case(black_box(title), &pos, &mut rpt));
                }
            }
        })
    });

    c.bench_function("tex to unicode", |b| {
        let pos = Pos::unknown();
        b.iter(|| {
            let mut rpt = Reporter::new();
            for entry in &db {
                if let Some(author) = entry.get("author") {
                    black_box(tex_to_unicode(black_box(author), &pos, &mut rpt));
                }
            }
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
