//! Unit tests for the consumer loop.

use std::{
    cell::RefCell,
    num::NonZeroUsize,
    rc::Rc,
    sync::{Arc, Mutex},
    time::Duration,
};

use rstest::rstest;

use super::*;
use crate::{
    frame::Frame,
    queue::{DeliveryQueue, FrameSender},
};

fn frame(id: u32) -> Frame { Frame::with_fields(id, 0, 0, vec![1u8; 2]).expect("payload fits") }

fn filled_queue(count: u32) -> (FrameSender, FrameReceiver) {
    let (sender, receiver) = DeliveryQueue::builder()
        .capacity(64)
        .build()
        .expect("failed to build delivery queue");
    for id in 0..count {
        sender.enqueue(frame(id)).expect("queue has room");
    }
    (sender, receiver)
}

fn ids(frames: &[Frame]) -> Vec<u32> { frames.iter().map(|f| f.header().id()).collect() }

type Seen = Arc<Mutex<Vec<u32>>>;

/// Handler recording the id of every frame it receives.
fn recorder() -> (Seen, impl FnMut(Frame) + Send + 'static) {
    let seen = Seen::default();
    let sink = Arc::clone(&seen);
    let handler = move |f: Frame| {
        sink.lock()
            .expect("recorder lock poisoned")
            .push(f.header().id());
    };
    (seen, handler)
}

fn recorded(seen: &Seen) -> Vec<u32> { seen.lock().expect("recorder lock poisoned").clone() }

#[rstest]
#[case::unbounded(None, 5)]
#[case::one_per_tick(NonZeroUsize::new(1), 1)]
#[case::cap_above_queue(NonZeroUsize::new(10), 5)]
fn tick_drains_queued_snapshot(#[case] cap: Option<NonZeroUsize>, #[case] expected: usize) {
    let (_sender, receiver) = filled_queue(5);
    let mut seen = Vec::new();
    let config = ConsumerConfig::default().max_frames_per_tick(cap);
    let mut consumer = ConsumerLoop::new(receiver, |f: Frame| seen.push(f), config);

    assert_eq!(consumer.tick(), expected);
    assert_eq!(consumer.dispatched(), expected as u64);
    drop(consumer);
    assert_eq!(ids(&seen), (0..).take(expected).collect::<Vec<u32>>());
}

#[test]
fn frames_enqueued_during_a_tick_wait_for_the_next() {
    let (sender, receiver) = filled_queue(2);
    let seen = Rc::new(RefCell::new(Vec::new()));
    let handler = {
        let seen = Rc::clone(&seen);
        move |f: Frame| {
            // Producer keeps up with the consumer; the pass must still end.
            let _ = sender.enqueue(frame(f.header().id() + 100));
            seen.borrow_mut().push(f);
        }
    };
    let mut consumer = ConsumerLoop::new(receiver, handler, ConsumerConfig::default());

    assert_eq!(consumer.tick(), 2);
    assert_eq!(ids(&seen.borrow()), vec![0, 1]);
    assert_eq!(consumer.tick(), 2);
    assert_eq!(ids(&seen.borrow()), vec![0, 1, 100, 101]);
}

#[tokio::test(start_paused = true)]
async fn run_stops_once_queue_is_closed_and_drained() {
    let (sender, receiver) = filled_queue(4);
    drop(sender);
    let config = ConsumerConfig::default().max_frames_per_tick(NonZeroUsize::new(1));

    let (seen, handler) = recorder();

    let exit = ConsumerLoop::new(receiver, handler, config).run().await;

    assert_eq!(exit.reason, StopReason::QueueClosed);
    assert_eq!(exit.dispatched, 4);
    assert_eq!(recorded(&seen), vec![0, 1, 2, 3]);
    assert!(exit.receiver.is_empty());
}

#[tokio::test(start_paused = true)]
async fn cancellation_keeps_queued_frames() {
    let (_sender, receiver) = filled_queue(3);
    let (seen, handler) = recorder();
    let consumer = ConsumerLoop::new(receiver, handler, ConsumerConfig::default());
    consumer.shutdown_token().cancel();

    let mut exit = consumer.run().await;

    assert_eq!(exit.reason, StopReason::Cancelled);
    assert_eq!(exit.dispatched, 0);
    assert!(recorded(&seen).is_empty());
    assert_eq!(exit.receiver.len(), 3);
    assert_eq!(exit.receiver.dequeue().map(|f| f.header().id()), Some(0));
}

#[tokio::test(start_paused = true)]
async fn restarted_loop_resumes_from_returned_receiver() {
    let (sender, receiver) = filled_queue(2);
    let token = CancellationToken::new();
    token.cancel();
    let (seen, handler) = recorder();
    let exit = ConsumerLoop::new(receiver, handler, ConsumerConfig::default())
        .with_shutdown(token)
        .run()
        .await;
    drop(sender);

    let resumed = ConsumerLoop::new(exit.receiver, exit.handler, ConsumerConfig::default())
        .run()
        .await;
    assert_eq!(resumed.reason, StopReason::QueueClosed);
    assert_eq!(recorded(&seen), vec![0, 1]);
}

#[tokio::test(start_paused = true)]
async fn spawned_loop_dispatches_frames_arriving_later() {
    let (sender, receiver) = DeliveryQueue::builder()
        .capacity(8)
        .build()
        .expect("failed to build delivery queue");
    let config = ConsumerConfig::default().poll_interval(Duration::from_millis(10));
    let (seen, handler) = recorder();
    let handle = ConsumerLoop::new(receiver, handler, config).spawn();

    for id in 0..3 {
        sender.deliver(frame(id)).await.expect("queue open");
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
    drop(sender);

    let exit = handle.await.expect("consumer task panicked");
    assert_eq!(exit.reason, StopReason::QueueClosed);
    assert_eq!(recorded(&seen), vec![0, 1, 2]);
}

#[test]
fn zero_poll_interval_is_clamped() {
    let config = ConsumerConfig::default().poll_interval(Duration::ZERO);
    assert_eq!(config.poll_interval_value(), Duration::from_millis(1));
}
