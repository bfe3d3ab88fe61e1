//! Ordering across the thread boundary between producer and consumer.

use std::sync::{Arc, Mutex};

use rstest::rstest;
use streamframe::{
    Frame,
    FullQueuePolicy,
    byte_order::write_le_u32,
    consumer::{ConsumerConfig, ConsumerLoop, StopReason},
    queue::DeliveryQueue,
};

fn frame(id: u32) -> Frame {
    Frame::with_fields(id, 0, 0, write_le_u32(id).to_vec()).expect("payload fits")
}

#[rstest]
#[case::tight(4)]
#[case::roomy(1024)]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn frames_cross_threads_in_order(#[case] capacity: usize) {
    const FRAMES: u32 = 5_000;
    let (sender, receiver) = DeliveryQueue::builder()
        .capacity(capacity)
        .policy(FullQueuePolicy::Backpressure)
        .build()
        .expect("valid capacity");

    let seen = Arc::new(Mutex::new(Vec::with_capacity(FRAMES as usize)));
    let consumer = {
        let seen = Arc::clone(&seen);
        ConsumerLoop::new(
            receiver,
            move |f: Frame| seen.lock().expect("lock poisoned").push(f.header().id()),
            ConsumerConfig::default(),
        )
    }
    .spawn();

    let producer = tokio::spawn(async move {
        for id in 0..FRAMES {
            sender.deliver(frame(id)).await.expect("consumer alive");
        }
    });

    producer.await.expect("producer panicked");
    let exit = consumer.await.expect("consumer panicked");
    assert_eq!(exit.reason, StopReason::QueueClosed);
    assert_eq!(exit.dispatched, u64::from(FRAMES));
    let seen = seen.lock().expect("lock poisoned");
    assert!(seen.iter().copied().eq(0..FRAMES), "frames reordered");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn cancelled_consumer_hands_back_pending_frames() {
    let (sender, receiver) = DeliveryQueue::builder()
        .capacity(8)
        .build()
        .expect("valid capacity");
    let consumer = ConsumerLoop::new(receiver, |_: Frame| {}, ConsumerConfig::default());
    let stop = consumer.shutdown_token();
    stop.cancel();
    let mut exit = consumer.run().await;
    assert_eq!(exit.reason, StopReason::Cancelled);

    sender.enqueue(frame(1)).expect("room");
    assert_eq!(exit.receiver.dequeue().map(|f| f.header().id()), Some(1));
}
