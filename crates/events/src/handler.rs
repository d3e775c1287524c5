/// Execute an aggregate command deterministically (no IO).
///
/// 1. **Decide**: calls `aggregate.handle(command)` (pure, no mutation)
/// 2. **Evolve**: applies each returned event via `aggregate.apply(event)`
///
/// On error the aggregate is left untouched. The returned events are what
/// the caller persists and publishes.
pub fn execute<A>(aggregate: &mut A, command: &A::Command) -> Result<Vec<A::Event>, A::Error>
where
    A: stroymarket_core::Aggregate,
{
    let events = A::handle(aggregate, command)?;
    for ev in &events {
        A::apply(aggregate, ev);
    }
    Ok(events)
}
