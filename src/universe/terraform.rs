//! Terraforming target resolution
//!
//! Terraformable planet types sit on a ring; one terraforming step moves a
//! planet to an adjacent type. Given a species' environment ratings, the
//! resolver finds the closest planet type carrying the best rating on the
//! ring and reports how far away it is in each direction.
//!
//! When the best type is equally far in both directions the forward
//! (clockwise, increasing ring index) direction wins.

use super::planet::{PlanetEnvironment, PlanetType};

/// Direction of travel around the terraform ring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Towards the next type in ring order
    Forward,
    /// Towards the previous type in ring order
    Backward,
}

/// Where terraforming should head from a given planet type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerraformRoute {
    /// Nearest best-rated type along the winning direction
    pub best: PlanetType,
    /// Steps to the nearest best-rated type going forward
    pub forward_steps: usize,
    /// Steps to the nearest best-rated type going backward
    pub backward_steps: usize,
}

impl TerraformRoute {
    /// Winning direction; ties go forward
    pub fn direction(&self) -> Direction {
        if self.forward_steps <= self.backward_steps {
            Direction::Forward
        } else {
            Direction::Backward
        }
    }

    /// Steps needed along the winning direction
    pub fn steps(&self) -> usize {
        self.forward_steps.min(self.backward_steps)
    }
}

/// An ordered cycle of planet types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerraformRing<'a> {
    types: &'a [PlanetType],
}

impl TerraformRing<'static> {
    /// The nine-type ring every species uses
    pub const STANDARD: TerraformRing<'static> = TerraformRing {
        types: &PlanetType::TERRAFORM_RING,
    };
}

impl<'a> TerraformRing<'a> {
    pub fn new(types: &'a [PlanetType]) -> Self {
        Self { types }
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn types(&self) -> &'a [PlanetType] {
        self.types
    }

    pub fn position(&self, planet_type: PlanetType) -> Option<usize> {
        self.types.iter().position(|pt| *pt == planet_type)
    }

    /// Neighbour of `planet_type` in `direction`; types off the ring stay put
    pub fn step(&self, planet_type: PlanetType, direction: Direction) -> PlanetType {
        let Some(index) = self.position(planet_type) else {
            return planet_type;
        };
        let n = self.types.len();
        match direction {
            Direction::Forward => self.types[(index + 1) % n],
            Direction::Backward => self.types[(index + n - 1) % n],
        }
    }

    /// Route from `initial` to the closest best-rated type, or `None` when
    /// no type on the ring is rated strictly better than `initial`.
    pub fn route_to_best<F>(&self, initial: PlanetType, environment: F) -> Option<TerraformRoute>
    where
        F: Fn(PlanetType) -> PlanetEnvironment,
    {
        let n = self.types.len();
        if n <= 1 {
            return None;
        }
        let start = self.position(initial)?;

        let best_environment = self.types.iter().map(|pt| environment(*pt)).max()?;
        if environment(initial) >= best_environment {
            return None;
        }

        // Walk outwards both ways at once; the first hit in each direction
        // is the closest best-rated type on that side.
        let mut forward: Option<(PlanetType, usize)> = None;
        let mut backward: Option<(PlanetType, usize)> = None;
        for step in 1..n {
            if forward.is_none() {
                let candidate = self.types[(start + step) % n];
                if environment(candidate) == best_environment {
                    forward = Some((candidate, step));
                }
            }
            if backward.is_none() {
                let candidate = self.types[(start + n - step) % n];
                if environment(candidate) == best_environment {
                    backward = Some((candidate, step));
                }
            }
            if forward.is_some() && backward.is_some() {
                break;
            }
        }

        let (forward_type, forward_steps) = forward?;
        let (backward_type, backward_steps) = backward?;
        let best = if forward_steps <= backward_steps {
            forward_type
        } else {
            backward_type
        };

        Some(TerraformRoute {
            best,
            forward_steps,
            backward_steps,
        })
    }

    /// Resolve the route from `initial` and let `apply` pick the result.
    ///
    /// Returns `initial` unchanged when terraforming can't improve it.
    pub fn apply_best_route<F, A>(&self, initial: PlanetType, environment: F, apply: A) -> PlanetType
    where
        F: Fn(PlanetType) -> PlanetEnvironment,
        A: FnOnce(&TerraformRoute) -> PlanetType,
    {
        match self.route_to_best(initial, environment) {
            Some(route) => apply(&route),
            None => initial,
        }
    }

    /// The closest best-rated type itself
    pub fn next_best<F>(&self, initial: PlanetType, environment: F) -> PlanetType
    where
        F: Fn(PlanetType) -> PlanetEnvironment,
    {
        self.apply_best_route(initial, environment, |route| route.best)
    }

    /// One terraforming step towards the closest best-rated type
    pub fn next_better<F>(&self, initial: PlanetType, environment: F) -> PlanetType
    where
        F: Fn(PlanetType) -> PlanetEnvironment,
    {
        self.apply_best_route(initial, environment, |route| {
            self.step(initial, route.direction())
        })
    }
}
