use buster_core::config::GameConfig;
use buster_core::engine::BeliefEngine;
use buster_core::event::Event;
use buster_core::model::deck::deal_hands;
use buster_core::model::player::PlayerId;
use buster_core::model::value::WireValue;
use criterion::{criterion_group, criterion_main, BatchSize, Criterion};

fn scripted_game() -> (GameConfig, Vec<buster_core::model::hand::Hand>, Vec<Event>) {
    let config = GameConfig::with_distribution(4, [(1, 4), (2, 4), (3, 4), (4, 4), (5, 4)]);
    let layout = config.layout().unwrap();
    let hands = deal_hands(&layout, 42);

    // A deterministic opening: every player signals their last wire,
    // then a couple of truthful calls from the dealt hands.
    let mut events: Vec<Event> = (0..4)
        .map(|index| {
            let player = PlayerId(index);
            let position = layout.hand_len() - 1;
            Event::SignalCertain {
                player,
                position,
                value: hands[index as usize].wire(position).unwrap(),
            }
        })
        .collect();
    let target_value = hands[1].wire(0).unwrap();
    if let Some(caller_position) = hands[0].positions_of(target_value).next() {
        events.push(Event::Call {
            caller: PlayerId(0),
            target: PlayerId(1),
            position: 0,
            value: target_value,
            success: true,
            caller_position: Some(caller_position),
        });
    }
    (config, hands, events)
}

fn bench_replay(c: &mut Criterion) {
    let mut group = c.benchmark_group("replay_pipeline");
    let (config, hands, events) = scripted_game();

    for global in [false, true] {
        let mut config = config.clone();
        config.global_solver = global;
        let label = if global { "global" } else { "local_only" };
        group.bench_function(format!("replay_{label}"), |b| {
            b.iter_batched(
                || {
                    BeliefEngine::new(config.clone(), PlayerId(0), hands[0].clone())
                        .expect("valid setup")
                },
                |mut engine| {
                    for event in &events {
                        engine.apply(event.clone()).expect("truthful events");
                    }
                    engine.metrics().system_entropy
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_replay);
criterion_main!(benches);
