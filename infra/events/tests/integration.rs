use orbit_event_bus::{EventBus, EventBusError, EventReceiverExt};
use std::sync::Arc;

#[derive(Clone, Debug, PartialEq, Eq)]
struct Switched(&'static str);

#[derive(Clone, Debug, PartialEq, Eq)]
struct Changed(u64);

#[tokio::test]
async fn broadcast_delivers_to_every_subscriber() {
    let bus = EventBus::new();
    let mut rx1 = bus.subscribe::<Switched>().unwrap();
    let mut rx2 = bus.subscribe::<Switched>().unwrap();

    let reached = bus.publish(Switched("qa")).unwrap();
    assert_eq!(reached, 2);

    assert_eq!(rx1.recv().await.unwrap().0, "qa");
    assert_eq!(rx2.recv().await.unwrap().0, "qa");
}

#[tokio::test]
async fn broadcast_preserves_order_per_subscriber() {
    let bus = EventBus::new();
    let mut rx = bus.subscribe::<Changed>().unwrap();

    for generation in 0..20 {
        bus.publish(Changed(generation)).unwrap();
    }

    for generation in 0..20 {
        assert_eq!(rx.recv().await.unwrap().0, generation);
    }
}

#[tokio::test]
async fn event_types_are_isolated() {
    let bus = EventBus::new();
    let mut switched = bus.subscribe::<Switched>().unwrap();
    let mut changed = bus.subscribe::<Changed>().unwrap();

    bus.publish(Switched("dev")).unwrap();
    bus.publish(Changed(7)).unwrap();

    assert_eq!(switched.recv().await.unwrap().0, "dev");
    assert_eq!(changed.recv().await.unwrap().0, 7);
}

#[tokio::test]
async fn publish_without_subscribers_drops_quietly() {
    let bus = EventBus::new();
    assert_eq!(bus.publish(Switched("prod")).unwrap(), 0);
}

#[tokio::test]
async fn watch_coalesces_rapid_publishes() {
    let bus = EventBus::new();
    let mut rx = bus.subscribe_watch::<Changed>(Changed(0)).unwrap();

    for generation in 1..=50 {
        bus.publish_watch(Changed(generation)).unwrap();
    }

    // Fifty writes collapse into the single latest observation.
    let latest = EventReceiverExt::recv(&mut rx).await.unwrap();
    assert_eq!(latest.0, 50);
    assert!(!rx.has_changed().unwrap());
}

#[tokio::test]
async fn watch_subscriber_sees_value_published_before_subscribing() {
    let bus = EventBus::new();
    bus.publish_watch(Changed(3)).unwrap();

    let rx = bus.subscribe_watch::<Changed>(Changed(0)).unwrap();
    assert_eq!(rx.borrow().0, 3);
}

#[tokio::test]
async fn mixing_channel_kinds_is_rejected() {
    let bus = EventBus::new();
    let _rx = bus.subscribe::<Switched>().unwrap();

    let err = bus.publish_watch(Switched("dev")).unwrap_err();
    assert!(matches!(err, EventBusError::KindMismatch { existing: "broadcast", .. }));

    let bus = EventBus::new();
    bus.publish_watch(Changed(1)).unwrap();
    let err = bus.subscribe::<Changed>().unwrap_err();
    assert!(matches!(err, EventBusError::KindMismatch { existing: "watch", .. }));
}

#[tokio::test]
async fn zero_capacity_is_rejected() {
    let bus = EventBus::new();
    let result = bus.subscribe_with_capacity::<Changed>(0);
    assert!(matches!(result, Err(EventBusError::InvalidCapacity { requested: 0 })));
}

#[tokio::test]
async fn lagged_broadcast_receiver_recovers_via_ext() {
    let bus = EventBus::new();
    let mut rx = bus.subscribe_with_capacity::<Changed>(2).unwrap();

    for generation in 0..100 {
        bus.publish(Changed(generation)).unwrap();
    }

    let first = EventReceiverExt::recv(&mut rx).await.unwrap();
    assert!(first.0 >= 98, "expected the retained tail, got {}", first.0);
}

#[tokio::test]
async fn shutdown_closes_open_channels() {
    let bus = EventBus::new();
    let mut broadcast_rx = bus.subscribe::<Switched>().unwrap();
    let mut watch_rx = bus.subscribe_watch::<Changed>(Changed(0)).unwrap();

    assert_eq!(bus.shutdown(), 2);

    assert!(EventReceiverExt::recv(&mut broadcast_rx).await.is_none());
    assert!(EventReceiverExt::recv(&mut watch_rx).await.is_none());
}

#[tokio::test]
async fn concurrent_publishers_all_deliver() {
    let bus = Arc::new(EventBus::new());
    let mut rx = bus.subscribe_with_capacity::<Changed>(256).unwrap();

    let a = {
        let bus = bus.clone();
        tokio::spawn(async move {
            for generation in 0..50 {
                bus.publish(Changed(generation)).unwrap();
            }
        })
    };
    let b = {
        let bus = bus.clone();
        tokio::spawn(async move {
            for generation in 50..100 {
                bus.publish(Changed(generation)).unwrap();
            }
        })
    };
    a.await.unwrap();
    b.await.unwrap();

    let mut received = 0;
    while let Ok(event) =
        tokio::time::timeout(std::time::Duration::from_millis(100), rx.recv()).await
    {
        event.unwrap();
        received += 1;
    }
    assert_eq!(received, 100);
}
