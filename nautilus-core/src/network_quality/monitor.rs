//! Quality classification and the observing monitor.
//!
//! The monitor never touches the network. It reads connection metadata
//! handed to it by the host and republishes a derived [`NetworkStatus`]
//! to its subscribers.

use tracing::{debug, info};

use super::types::{ConnectionQuality, ConnectionSignal, EffectiveType, NetworkStatus};

/// Map an observation to a discrete quality.
///
/// # Contract
///
/// - `online == false` → `Offline`, whatever the declared type.
/// - `4g` → `Excellent`, `3g` → `Good`, `2g` → `Fair`.
/// - Everything else, `slow-2g` and `unknown` included → `Poor`.
pub fn classify_quality(online: bool, effective_type: EffectiveType) -> ConnectionQuality {
    if !online {
        return ConnectionQuality::Offline;
    }
    match effective_type {
        EffectiveType::FourG => ConnectionQuality::Excellent,
        EffectiveType::ThreeG => ConnectionQuality::Good,
        EffectiveType::TwoG => ConnectionQuality::Fair,
        EffectiveType::Slow2G | EffectiveType::Unknown => ConnectionQuality::Poor,
    }
}

impl NetworkStatus {
    /// Derive a status from a raw signal.
    ///
    /// Missing connection metadata degrades to `Poor` (or `Offline` when
    /// the basic flag says so), never to an optimistic rating.
    pub fn from_signal(signal: &ConnectionSignal) -> Self {
        let effective_type = match signal.effective_type {
            Some(t) => t,
            None => {
                debug!(online = signal.online, "connection metadata unavailable");
                EffectiveType::Unknown
            }
        };
        Self {
            quality: classify_quality(signal.online, effective_type),
            online: signal.online,
            effective_type,
            downlink_mbps: signal.downlink_mbps,
            rtt_ms: signal.rtt_ms,
            save_data: signal.save_data,
        }
    }
}

/// Handle returned by [`NetworkQualityMonitor::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&NetworkStatus) + Send>;

/// Holds the last-known network status and fans every new observation
/// out to registered listeners, in registration order.
pub struct NetworkQualityMonitor {
    status: NetworkStatus,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_id: u64,
}

impl NetworkQualityMonitor {
    /// Create a monitor, evaluating the initial signal once.
    pub fn new(initial: &ConnectionSignal) -> Self {
        let status = NetworkStatus::from_signal(initial);
        debug!(quality = %status.quality, "network monitor initialised");
        Self {
            status,
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    /// Record a new platform observation and notify subscribers.
    pub fn observe(&mut self, signal: &ConnectionSignal) -> NetworkStatus {
        let status = NetworkStatus::from_signal(signal);
        if status.quality != self.status.quality {
            info!(
                from = %self.status.quality,
                to = %status.quality,
                "connection quality changed"
            );
        }
        self.status = status;
        for (_, listener) in self.listeners.iter_mut() {
            listener(&self.status);
        }
        self.status.clone()
    }

    /// Register a listener. It is not called for the current status;
    /// read [`status`](Self::status) for that.
    ///
    /// Listeners are `Send` so a monitor can move between threads with
    /// its owner.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&NetworkStatus) + Send + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if the id was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    pub fn status(&self) -> &NetworkStatus {
        &self.status
    }

    pub fn quality(&self) -> ConnectionQuality {
        self.status.quality
    }

    pub fn is_online(&self) -> bool {
        self.status.online
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }
}

impl std::fmt::Debug for NetworkQualityMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetworkQualityMonitor")
            .field("status", &self.status)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn offline_wins_over_declared_type() {
        assert_eq!(
            classify_quality(false, EffectiveType::FourG),
            ConnectionQuality::Offline
        );
    }

    #[test]
    fn missing_metadata_is_poor() {
        let signal = ConnectionSignal {
            online: true,
            ..Default::default()
        };
        let status = NetworkStatus::from_signal(&signal);
        assert_eq!(status.quality, ConnectionQuality::Poor);
        assert!(status.online);
        assert_eq!(status.effective_type, EffectiveType::Unknown);
    }

    #[test]
    fn missing_metadata_while_offline_is_offline() {
        let status = NetworkStatus::from_signal(&ConnectionSignal::offline());
        assert_eq!(status.quality, ConnectionQuality::Offline);
        assert!(!status.online);
    }

    #[test]
    fn initial_signal_is_evaluated() {
        let monitor = NetworkQualityMonitor::new(&ConnectionSignal::online(EffectiveType::ThreeG));
        assert_eq!(monitor.quality(), ConnectionQuality::Good);
        assert!(monitor.is_online());
    }

    #[test]
    fn observe_replaces_status_and_notifies() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut monitor =
            NetworkQualityMonitor::new(&ConnectionSignal::online(EffectiveType::FourG));
        monitor.subscribe(move |s| sink.lock().unwrap().push(s.quality));

        monitor.observe(&ConnectionSignal::online(EffectiveType::TwoG));
        monitor.observe(&ConnectionSignal::offline());

        assert_eq!(
            *seen.lock().unwrap(),
            vec![ConnectionQuality::Fair, ConnectionQuality::Offline]
        );
        assert_eq!(monitor.quality(), ConnectionQuality::Offline);
    }

    #[test]
    fn unsubscribe_stops_notifications() {
        let count = Arc::new(Mutex::new(0));
        let sink = Arc::clone(&count);
        let mut monitor = NetworkQualityMonitor::new(&ConnectionSignal::offline());
        let id = monitor.subscribe(move |_| *sink.lock().unwrap() += 1);

        monitor.observe(&ConnectionSignal::online(EffectiveType::FourG));
        assert!(monitor.unsubscribe(id));
        assert!(!monitor.unsubscribe(id));
        monitor.observe(&ConnectionSignal::offline());

        assert_eq!(*count.lock().unwrap(), 1);
        assert_eq!(monitor.subscriber_count(), 0);
    }

    #[test]
    fn monitor_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<NetworkQualityMonitor>();
    }

    #[test]
    fn monitor_moves_across_threads_with_listeners() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut monitor = NetworkQualityMonitor::new(&ConnectionSignal::offline());
        monitor.subscribe(move |s| sink.lock().unwrap().push(s.quality));

        let handle = std::thread::spawn(move || {
            monitor.observe(&ConnectionSignal::online(EffectiveType::ThreeG));
            monitor
        });
        let monitor = handle.join().unwrap();

        assert_eq!(monitor.quality(), ConnectionQuality::Good);
        assert_eq!(*seen.lock().unwrap(), vec![ConnectionQuality::Good]);
    }

    #[test]
    fn metadata_is_carried_through() {
        let signal = ConnectionSignal::online(EffectiveType::FourG)
            .with_downlink(9.5)
            .with_rtt(50)
            .with_save_data(true);
        let status = NetworkStatus::from_signal(&signal);
        assert_eq!(status.downlink_mbps, Some(9.5));
        assert_eq!(status.rtt_ms, Some(50));
        assert!(status.save_data);
    }
}
