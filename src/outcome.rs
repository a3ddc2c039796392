#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

//! Disjoint failure/success container and its combinators.

use serde::{Deserialize, Serialize};

/// Exactly one of a failure value or a success value.
///
/// Failure sits on the left so signatures read `Outcome<ErrorKind, T>`.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome<F, S> {
    Failure(F),
    Success(S),
}

impl<F, S> Outcome<F, S> {
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Applies `fn_` to the success value. Failures pass through untouched.
    pub fn map<S2, M>(self, fn_: M) -> Outcome<F, S2>
    where
        M: FnOnce(S) -> S2,
    {
        match self {
            Self::Failure(fail) => Outcome::Failure(fail),
            Self::Success(value) => Outcome::Success(fn_(value)),
        }
    }

    pub fn map_failure<F2, M>(self, fn_: M) -> Outcome<F2, S>
    where
        M: FnOnce(F) -> F2,
    {
        match self {
            Self::Failure(fail) => Outcome::Failure(fn_(fail)),
            Self::Success(value) => Outcome::Success(value),
        }
    }

    /// Chains a dependent fallible step; the first failure short-circuits.
    pub fn flat_map<S2, M>(self, fn_: M) -> Outcome<F, S2>
    where
        M: FnOnce(S) -> Outcome<F, S2>,
    {
        match self {
            Self::Failure(fail) => Outcome::Failure(fail),
            Self::Success(value) => fn_(value),
        }
    }

    /// Eliminates the outcome. Exactly one branch runs.
    pub fn fold<X, OnFailure, OnSuccess>(self, on_failure: OnFailure, on_success: OnSuccess) -> X
    where
        OnFailure: FnOnce(F) -> X,
        OnSuccess: FnOnce(S) -> X,
    {
        match self {
            Self::Failure(fail) => on_failure(fail),
            Self::Success(value) => on_success(value),
        }
    }

    #[must_use]
    pub fn get_or_else(self, default: S) -> S {
        match self {
            Self::Failure(_) => default,
            Self::Success(value) => value,
        }
    }

    /// Runs a side effect on the success value and hands the outcome back unchanged.
    pub fn on_success<E>(self, effect: E) -> Self
    where
        E: FnOnce(&S),
    {
        if let Self::Success(value) = &self {
            effect(value);
        }
        self
    }

    pub fn on_failure<E>(self, effect: E) -> Self
    where
        E: FnOnce(&F),
    {
        if let Self::Failure(fail) = &self {
            effect(fail);
        }
        self
    }

    pub const fn as_ref(&self) -> Outcome<&F, &S> {
        match self {
            Self::Failure(fail) => Outcome::Failure(fail),
            Self::Success(value) => Outcome::Success(value),
        }
    }

    #[must_use]
    pub fn success(self) -> Option<S> {
        match self {
            Self::Failure(_) => None,
            Self::Success(value) => Some(value),
        }
    }

    #[must_use]
    pub fn failure(self) -> Option<F> {
        match self {
            Self::Failure(fail) => Some(fail),
            Self::Success(_) => None,
        }
    }

    /// Converts into a std `Result` so callers can use `?`.
    ///
    /// # Errors
    ///
    /// Returns the failure value when the outcome is a `Failure`.
    pub fn into_result(self) -> Result<S, F> {
        match self {
            Self::Failure(fail) => Err(fail),
            Self::Success(value) => Ok(value),
        }
    }
}

impl<F, S> From<Result<S, F>> for Outcome<F, S> {
    fn from(result: Result<S, F>) -> Self {
        match result {
            Ok(value) => Self::Success(value),
            Err(fail) => Self::Failure(fail),
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use std::cell::Cell;

    type Sample = Outcome<&'static str, i32>;

    fn halve(x: i32) -> Sample {
        if x % 2 == 0 {
            Outcome::Success(x / 2)
        } else {
            Outcome::Failure("odd")
        }
    }

    fn shrink(x: i32) -> Sample {
        if x > 10 {
            Outcome::Success(x - 10)
        } else {
            Outcome::Failure("small")
        }
    }

    #[test]
    fn map_identity_keeps_success() {
        let outcome: Sample = Outcome::Success(7);
        assert_eq!(outcome.map(|x| x), Outcome::Success(7));
    }

    #[test]
    fn map_never_invokes_function_on_failure() {
        let called = Cell::new(false);
        let outcome: Sample = Outcome::Failure("boom");

        let mapped = outcome.map(|x| {
            called.set(true);
            x + 1
        });

        assert_eq!(mapped, Outcome::Failure("boom"));
        assert!(!called.get());
    }

    #[test]
    fn flat_map_is_associative() {
        for start in [-4, 3, 40, 44, 64] {
            let value: Sample = Outcome::Success(start);
            let left = value.flat_map(halve).flat_map(shrink);
            let right = value.flat_map(|x| halve(x).flat_map(shrink));
            assert_eq!(left, right, "diverged for {start}");
        }

        let failed: Sample = Outcome::Failure("early");
        assert_eq!(
            failed.flat_map(halve).flat_map(shrink),
            failed.flat_map(|x| halve(x).flat_map(shrink))
        );
    }

    #[test]
    fn flat_map_short_circuits_on_first_failure() {
        let calls = Cell::new(0);
        let result = halve(3).flat_map(|x| {
            calls.set(calls.get() + 1);
            shrink(x)
        });

        assert_eq!(result, Outcome::Failure("odd"));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn fold_runs_exactly_one_branch() {
        let failures = Cell::new(0);
        let successes = Cell::new(0);

        let from_success = Sample::Success(5).fold(
            |_| {
                failures.set(failures.get() + 1);
                "failure"
            },
            |_| {
                successes.set(successes.get() + 1);
                "success"
            },
        );
        let from_failure = Sample::Failure("nope").fold(
            |_| {
                failures.set(failures.get() + 1);
                "failure"
            },
            |_| {
                successes.set(successes.get() + 1);
                "success"
            },
        );

        assert_eq!(from_success, "success");
        assert_eq!(from_failure, "failure");
        assert_eq!((failures.get(), successes.get()), (1, 1));
    }

    #[test]
    fn get_or_else_prefers_success_payload() {
        assert_eq!(Sample::Success(3).get_or_else(99), 3);
        assert_eq!(Sample::Failure("x").get_or_else(99), 99);
    }

    #[test]
    fn on_success_observes_without_changing_value() {
        let seen = Cell::new(None);
        let outcome = Sample::Success(12).on_success(|value| seen.set(Some(*value)));

        assert_eq!(outcome, Outcome::Success(12));
        assert_eq!(seen.get(), Some(12));

        let untouched = Cell::new(false);
        let failed = Sample::Failure("bad").on_success(|_| untouched.set(true));
        assert!(failed.is_failure());
        assert!(!untouched.get());
    }

    #[test]
    fn map_failure_never_invokes_function_on_success() {
        let called = Cell::new(false);
        let outcome = Sample::Success(8).map_failure(|fail| {
            called.set(true);
            fail.len()
        });

        assert_eq!(outcome, Outcome::Success(8));
        assert!(!called.get());
    }

    #[test]
    fn map_failure_transforms_only_the_failure_payload() {
        let outcome = Sample::Failure("boom").map_failure(str::len);
        assert_eq!(outcome, Outcome::Failure(4));
    }

    #[test]
    fn on_failure_observes_without_changing_value() {
        let seen = Cell::new(None);
        let failed = Sample::Failure("bad").on_failure(|fail| seen.set(Some(*fail)));

        assert_eq!(failed, Outcome::Failure("bad"));
        assert_eq!(seen.get(), Some("bad"));

        let untouched = Cell::new(false);
        let outcome = Sample::Success(6).on_failure(|_| untouched.set(true));
        assert_eq!(outcome, Outcome::Success(6));
        assert!(!untouched.get());
    }

    #[test]
    fn as_ref_projects_both_variants_without_consuming() {
        let success = Sample::Success(5);
        let failure = Sample::Failure("nope");

        assert_eq!(success.as_ref(), Outcome::Success(&5));
        assert_eq!(failure.as_ref(), Outcome::Failure(&"nope"));
        assert_eq!(success.as_ref().map(|value| value * 2), Outcome::Success(10));
        assert_eq!(success, Outcome::Success(5));
    }

    #[test]
    fn converts_to_and_from_std_result() {
        let outcome: Sample = Ok::<i32, &str>(4).into();
        assert!(outcome.is_success());
        assert_eq!(outcome.into_result(), Ok(4));

        let failed: Sample = Err::<i32, &str>("no").into();
        assert_eq!(failed.failure(), Some("no"));
    }
}
