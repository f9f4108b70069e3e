use std::sync::Arc;

use super::subscriber::{Subscriber, SubscriberId};
use crate::broker::Message;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;

#[test]
fn test_subscriber_ids_are_unique() {
    let a = SubscriberId::new();
    let b = SubscriberId::new();
    assert_ne!(a, b);
    assert!(!a.to_string().is_empty());
}

#[test]
fn test_subscriber_keeps_its_id() {
    let (_tx, rx) = mpsc::channel::<Arc<Message<&str>>>(1);
    let id = SubscriberId::new();
    let subscriber = Subscriber::new(id, rx);
    assert_eq!(subscriber.id(), id);
    assert!(subscriber.is_empty());
}

#[tokio::test]
async fn test_subscriber_drains_before_end_of_stream() {
    let (tx, rx) = mpsc::channel(2);
    let mut subscriber = Subscriber::new(SubscriberId::new(), rx);

    tx.send(Arc::new(Message::new(1, "a"))).await.unwrap();
    tx.send(Arc::new(Message::new(2, "b"))).await.unwrap();
    drop(tx);

    assert_eq!(subscriber.len(), 2);
    assert_eq!(subscriber.recv().await.unwrap().payload, "a");
    assert_eq!(subscriber.recv().await.unwrap().payload, "b");
    assert!(subscriber.recv().await.is_none());
}

#[tokio::test]
async fn test_end_of_stream_is_idempotent() {
    let (tx, rx) = mpsc::channel::<Arc<Message<u8>>>(1);
    let mut subscriber = Subscriber::new(SubscriberId::new(), rx);
    drop(tx);

    for _ in 0..3 {
        assert!(subscriber.recv().await.is_none());
        assert_eq!(subscriber.try_recv(), Err(TryRecvError::Disconnected));
    }
}

#[test]
fn test_try_recv_reports_empty_while_open() {
    let (_tx, rx) = mpsc::channel::<Arc<Message<u8>>>(1);
    let mut subscriber = Subscriber::new(SubscriberId::new(), rx);
    assert_eq!(subscriber.try_recv(), Err(TryRecvError::Empty));
}

#[test]
fn test_blocking_recv_from_plain_thread() {
    let (tx, rx) = mpsc::channel(1);
    let mut subscriber = Subscriber::new(SubscriberId::new(), rx);

    let producer = std::thread::spawn(move || {
        tx.blocking_send(Arc::new(Message::new(7, "sync"))).unwrap();
    });

    let msg = subscriber.blocking_recv().unwrap();
    assert_eq!(msg.id, 7);
    producer.join().unwrap();
    assert!(subscriber.blocking_recv().is_none());
}
