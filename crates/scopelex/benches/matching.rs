#![allow(missing_docs)]

use divan::{Bencher, black_box, counter::BytesCount};
use scopelex::{Grammar, MatchOptions};

#[global_allocator]
static ALLOC: divan::AllocProfiler = divan::AllocProfiler::system();

fn main() {
    divan::main();
}

static SCENE_GRAMMAR: &str = include_str!("../tests/fixtures/scene.json");

static SCENE: &str = "INT. KITCHEN - NIGHT 2\n\
/* a note about the scene */ \"she says \\\"hi\\\" twice\"\n\
```js \"let x = 1\" ```\n\
EXT. ROAD 42\n\
The car stops. 7 people get out.\n";

fn scene_text() -> String {
    SCENE.repeat(50)
}

fn grammar() -> Grammar {
    Grammar::from_json(SCENE_GRAMMAR).unwrap()
}

#[divan::bench]
fn build_grammar() -> Grammar {
    grammar()
}

#[divan::bench]
fn tokenize_full(bencher: Bencher) {
    let text = scene_text();
    let grammar = grammar();
    bencher
        .counter(BytesCount::new(text.len()))
        .bench(|| grammar.tokenize(black_box(&text)).unwrap());
}

#[divan::bench]
fn tokenize_incremental(bencher: Bencher) {
    let text = scene_text();
    let grammar = grammar();
    let options = MatchOptions::default().with_possibly_incomplete(true);
    bencher.counter(BytesCount::new(text.len())).bench(|| {
        let mut state = grammar.start_state();
        grammar
            .tokenize_from(&mut state, black_box(&text), &options)
            .unwrap()
    });
}

#[divan::bench]
fn match_only(bencher: Bencher) {
    let text = scene_text();
    let grammar = grammar();
    bencher.counter(BytesCount::new(text.len())).bench(|| {
        let mut state = grammar.start_state();
        let mut pos = 0;
        let mut count = 0usize;
        while let Some(found) = grammar.match_at(&mut state, black_box(&text), pos).unwrap() {
            pos = found.to();
            count += 1;
        }
        count
    });
}
