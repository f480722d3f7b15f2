//! # Synchronize Benchmark
//!
//! Measures one synchronize pass draining a frame's worth of backlog, from
//! a handful of events up to a stalled render thread's pile-up.

#![allow(missing_docs)]
#![allow(clippy::cast_precision_loss)]

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use marionette::core::{EventBus, EventReceiver};
use marionette::rendering::{
    EngineFramework, MockEngine, MockFramework, MockModel, RenderBridge, RuntimeOptions,
    RuntimeRegistry,
};
use marionette::shared::{Notification, PointerButton, Priority};
use marionette::FrontendItem;

fn bridge() -> (RenderBridge<MockEngine>, FrontendItem, EventReceiver<Notification>) {
    let framework: Arc<dyn EngineFramework> = Arc::new(MockFramework::new());
    let runtime = RuntimeRegistry::new()
        .acquire(&framework, &RuntimeOptions::default())
        .expect("mock framework starts");
    let (notifier, notifications) = EventBus::create_pair();
    let mut item = FrontendItem::new(notifier.clone());
    item.set_size(800, 600);
    (
        RenderBridge::new(MockEngine::new(MockModel::sample()), runtime, notifier),
        item,
        notifications,
    )
}

fn fill(item: &mut FrontendItem, events: usize) {
    for i in 0..events {
        let x = (i % 800) as f64;
        match i % 10 {
            0 => {
                item.mouse_press(PointerButton::Primary, x, 300.0);
            }
            9 => {
                item.mouse_release(PointerButton::Primary, x, 300.0);
            }
            _ => {
                item.hover_move(x, 300.0);
            }
        }
        if i % 4 == 0 {
            item.start_motion("Idle", "Idle_0", Priority::Idle);
        }
    }
}

/// Pointer and command backlog drained by one pass
fn bench_drain(c: &mut Criterion) {
    let mut group = c.benchmark_group("synchronize_drain");

    for events in [16, 1_000, 100_000] {
        group.throughput(Throughput::Elements(events as u64));
        group.bench_with_input(BenchmarkId::new("events", events), &events, |b, &events| {
            let (mut bridge, mut item, notifications) = bridge();
            b.iter(|| {
                fill(&mut item, events);
                black_box(bridge.synchronize(&mut item));
                notifications.drain();
            });
        });
    }

    group.finish();
}

/// A pass with nothing to do
fn bench_idle(c: &mut Criterion) {
    let (mut bridge, mut item, _notifications) = bridge();
    bridge.synchronize(&mut item);

    c.bench_function("synchronize_idle", |b| {
        b.iter(|| black_box(bridge.synchronize(&mut item)));
    });
}

criterion_group!(benches, bench_drain, bench_idle);
criterion_main!(benches);
