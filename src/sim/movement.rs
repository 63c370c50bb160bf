//! Speculative move / rollback against static obstacles.
//!
//! The resolver only decides whether a position is legal.  It has no idea
//! what speed the entity had or what a crash costs; callers combine
//! `applied == false` with their own state to decide that.

use glam::Vec3;

use super::MobileEntity;
use crate::collision::{CollisionOutcome, Obstacles};

/// One tentative step; lives for a single resolve call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MovementAttempt {
    pub previous: Vec3,
    pub proposed: Vec3,
    /// Displacement per step that produced `proposed`.
    pub velocity: Vec3,
}

/// What the caller gets back.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MovementResult {
    pub applied: bool,
    pub outcome: CollisionOutcome,
}

impl MovementAttempt {
    #[inline]
    pub fn new(entity: &MobileEntity, displacement: Vec3) -> Self {
        let previous = entity.position();
        Self {
            previous,
            proposed: previous + displacement,
            velocity: displacement,
        }
    }
}

/// Move `entity` by `displacement` unless the new sphere hits an obstacle,
/// in which case the previous position is restored bit-for-bit.
///
/// All-or-nothing: there is no partial slide.
pub fn resolve<O: Obstacles + ?Sized>(
    entity: &mut MobileEntity,
    displacement: Vec3,
    obstacles: &O,
) -> MovementResult {
    let attempt = MovementAttempt::new(entity, displacement);

    entity.set_position(attempt.proposed);
    let outcome = obstacles.query(&entity.sphere());

    if outcome.is_hit() {
        entity.set_position(attempt.previous);
        return MovementResult {
            applied: false,
            outcome,
        };
    }

    MovementResult {
        applied: true,
        outcome: CollisionOutcome::None,
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::{BoundingSphere, CollisionIndex, HeightTable};
    use crate::world::{EMPTY, Grid};
    use glam::vec3;
    use rand::{Rng, SeedableRng, rngs::StdRng};
    use std::cell::Cell;

    /// 12×12 with a solid row along z = 9 (world z ∈ [-10, -9]).
    fn walled_index() -> CollisionIndex {
        let w = 12;
        let mut codes = vec![EMPTY; w * w];
        for x in 0..w {
            codes[9 * w + x] = 1;
        }
        let grid = Grid::from_codes(w, w, codes, 1).unwrap();
        CollisionIndex::build(&grid, &HeightTable::from_heights(&[2.0])).unwrap()
    }

    fn car_at(p: Vec3) -> MobileEntity {
        MobileEntity::new(p, BoundingSphere::new(Vec3::ZERO, 0.5), 1.0)
    }

    #[test]
    fn move_into_an_occupied_neighbour_is_rolled_back() {
        let index = walled_index();
        let mut car = car_at(vec3(9.5, 0.1, -8.5));

        let res = resolve(&mut car, vec3(0.0, 0.0, -0.1), &index);

        assert_eq!(
            res,
            MovementResult {
                applied: false,
                outcome: CollisionOutcome::Building
            }
        );
        assert_eq!(car.position(), vec3(9.5, 0.1, -8.5));
        assert_eq!(car.sphere().center, vec3(9.5, 0.0, -8.5));
    }

    #[test]
    fn clear_move_is_committed() {
        let index = walled_index();
        let mut car = car_at(vec3(3.5, 0.0, -2.5));

        let res = resolve(&mut car, vec3(0.25, 0.0, -1.0), &index);

        assert!(res.applied);
        assert_eq!(res.outcome, CollisionOutcome::None);
        assert_eq!(car.position(), vec3(3.75, 0.0, -3.5));
    }

    #[test]
    fn rollback_and_commit_hold_for_random_moves() {
        let index = walled_index();
        let mut rng = StdRng::seed_from_u64(0xD1CE);
        for _ in 0..2_000 {
            let start = vec3(rng.gen_range(0.6..11.4), 0.1, rng.gen_range(-8.4..-0.6));
            let d = vec3(rng.gen_range(-2.0..2.0), 0.0, rng.gen_range(-2.0..2.0));
            let mut car = car_at(start);

            let target = car_at(start + d);
            let blocked = index.query(&target.sphere()).is_hit();
            let res = resolve(&mut car, d, &index);

            if blocked {
                assert!(!res.applied);
                assert_eq!(car.position().to_array(), start.to_array());
            } else {
                assert!(res.applied);
                assert_eq!(car.position(), start + d);
            }
        }
    }

    #[test]
    fn zero_displacement_on_open_street_is_applied() {
        let index = walled_index();
        let mut car = car_at(vec3(1.5, 0.0, -1.5));
        let res = resolve(&mut car, Vec3::ZERO, &index);
        assert!(res.applied);
        assert_eq!(car.position(), vec3(1.5, 0.0, -1.5));
    }

    /// Obstacles stub that records the sphere it was asked about.
    struct Recorder {
        seen: Cell<Option<BoundingSphere>>,
        answer: CollisionOutcome,
    }

    impl Obstacles for Recorder {
        fn query(&self, sphere: &BoundingSphere) -> CollisionOutcome {
            self.seen.set(Some(*sphere));
            self.answer
        }
    }

    #[test]
    fn obstacles_are_asked_about_the_proposed_sphere() {
        let rec = Recorder {
            seen: Cell::new(None),
            answer: CollisionOutcome::Enemy,
        };
        let mut car = car_at(vec3(1.0, 0.0, -1.0));

        let res = resolve(&mut car, vec3(2.0, 5.0, 0.0), &rec);

        assert_eq!(rec.seen.get().unwrap().center, vec3(3.0, 0.0, -1.0));
        assert_eq!(res.outcome, CollisionOutcome::Enemy);
        assert!(!res.applied);
        assert_eq!(car.position(), vec3(1.0, 0.0, -1.0));
    }

    #[test]
    fn attempt_records_both_ends() {
        let car = car_at(vec3(1.0, 0.0, -1.0));
        let a = MovementAttempt::new(&car, vec3(0.5, 0.0, -0.5));
        assert_eq!(a.previous, vec3(1.0, 0.0, -1.0));
        assert_eq!(a.proposed, vec3(1.5, 0.0, -1.5));
        assert_eq!(a.velocity, vec3(0.5, 0.0, -0.5));
    }
}
