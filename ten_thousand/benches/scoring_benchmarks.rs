use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use ten_thousand::{
    DiceSet, Match, MatchConfig, MatchPhase, MemoryStore, NullRecorder, Seat,
    bot::BotDifficulty,
    game::{
        scoring::evaluate,
        validation::{has_any_scoring_option, scoring_subsets},
    },
    rng::RngSource,
};

/// Helper to create a started match with N bot seats
fn setup_bot_match(n_players: usize, seed: u64) -> Match {
    let store = MemoryStore::new();
    let seats = (0..n_players)
        .map(|i| {
            let id = i as i64 + 1;
            store.add_player(id, format!("bot{id}"));
            Seat::bot(id, BotDifficulty::Intermediate)
        })
        .collect();
    let config = MatchConfig::new(seats);
    let mut game = Match::new(config, &store, RngSource::seeded(seed), NullRecorder).unwrap();
    game.start().unwrap();
    game
}

/// Benchmark scoring a single die
fn bench_evaluate_single(c: &mut Criterion) {
    c.bench_function("evaluate_single_five", |b| {
        b.iter(|| evaluate(black_box(&[5u8])));
    });
}

/// Benchmark scoring a full six-dice selection
fn bench_evaluate_six(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate_six");
    let rolls: [(&str, [u8; 6]); 4] = [
        ("straight", [1, 2, 3, 4, 5, 6]),
        ("three_pairs", [2, 2, 3, 3, 6, 6]),
        ("mixed", [1, 1, 1, 5, 5, 2]),
        ("no_score", [2, 3, 4, 6, 6, 2]),
    ];
    for (name, faces) in rolls {
        group.bench_with_input(BenchmarkId::from_parameter(name), &faces, |b, faces| {
            b.iter(|| evaluate(black_box(faces)));
        });
    }
    group.finish();
}

/// Benchmark bust detection over every subset of a roll
fn bench_has_any_scoring_option(c: &mut Criterion) {
    c.bench_function("has_any_scoring_option_bust", |b| {
        b.iter(|| has_any_scoring_option(black_box(&[2u8, 3, 4, 6, 6, 2])));
    });
}

/// Benchmark enumerating the scoring subsets a bot chooses from
fn bench_scoring_subsets(c: &mut Criterion) {
    let dice = DiceSet::with_faces([1, 1, 5, 5, 3, 3]);
    c.bench_function("scoring_subsets_six_dice", |b| {
        b.iter(|| scoring_subsets(black_box(dice.dice())));
    });
}

/// Benchmark playing bot turns until the match ends
fn bench_bot_match(c: &mut Criterion) {
    let mut group = c.benchmark_group("bot_match");
    group.sample_size(20);
    for n_players in [2usize, 4].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}_players", n_players)),
            n_players,
            |b, &n| {
                b.iter_batched(
                    || setup_bot_match(n, 7),
                    |mut game| {
                        while game.phase() == MatchPhase::InProgress {
                            game.play_bot_turn().unwrap();
                        }
                        game
                    },
                    criterion::BatchSize::SmallInput,
                );
            },
        );
    }
    group.finish();
}

criterion_group!(
    scoring,
    bench_evaluate_single,
    bench_evaluate_six,
    bench_has_any_scoring_option,
    bench_scoring_subsets,
);

criterion_group!(match_play, bench_bot_match);

criterion_main!(scoring, match_play);
