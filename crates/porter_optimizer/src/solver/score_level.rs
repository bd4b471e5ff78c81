/// Hard scores encode constraint violations; soft scores encode the
/// objective. A nonzero hard score means the solution is not feasible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreLevel {
    Hard,
    Soft,
}
