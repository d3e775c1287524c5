use chrono::{DateTime, Utc};

/// A fact emitted by an aggregate.
///
/// `event_type` is a dotted name that stays stable across releases
/// (`"cart.item.merged"`, `"sales.order.placed"`); `version` moves when the
/// payload shape changes.
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    fn event_type(&self) -> &'static str;

    fn version(&self) -> u32;

    /// Business time of the change, taken from the command.
    fn occurred_at(&self) -> DateTime<Utc>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[derive(Debug, Clone)]
    struct Restocked {
        at: DateTime<Utc>,
    }

    impl Event for Restocked {
        fn event_type(&self) -> &'static str {
            "catalog.product.restocked"
        }

        fn version(&self) -> u32 {
            2
        }

        fn occurred_at(&self) -> DateTime<Utc> {
            self.at
        }
    }

    #[test]
    fn events_can_be_ordered_by_business_time() {
        let early = Restocked { at: Utc.with_ymd_and_hms(2024, 3, 10, 8, 0, 0).unwrap() };
        let late = Restocked { at: Utc.with_ymd_and_hms(2024, 3, 12, 8, 0, 0).unwrap() };

        let mut events = vec![late.clone(), early.clone()];
        events.sort_by_key(Event::occurred_at);

        assert_eq!(events[0].occurred_at(), early.at);
        assert_eq!(events[1].event_type(), "catalog.product.restocked");
        assert_eq!(events[1].version(), 2);
    }
}
