//! Ship filtering.

use chrono::{DateTime, Utc};

use crate::domain::{Ship, ShipType};

/// Optional criteria a ship must satisfy to be listed.
///
/// Unset criteria impose no constraint. Numeric ranges are inclusive on both
/// ends, production date bounds are exclusive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShipFilter {
    /// Substring of the name.
    pub name: Option<String>,
    /// Substring of the planet.
    pub planet: Option<String>,
    /// Exact ship class.
    pub ship_type: Option<ShipType>,
    /// Produced strictly after this instant.
    pub after: Option<DateTime<Utc>>,
    /// Produced strictly before this instant.
    pub before: Option<DateTime<Utc>>,
    /// Exact used flag.
    pub is_used: Option<bool>,
    /// Minimum speed.
    pub min_speed: Option<f64>,
    /// Maximum speed.
    pub max_speed: Option<f64>,
    /// Minimum crew size.
    pub min_crew_size: Option<i32>,
    /// Maximum crew size.
    pub max_crew_size: Option<i32>,
    /// Minimum rating.
    pub min_rating: Option<f64>,
    /// Maximum rating.
    pub max_rating: Option<f64>,
}

impl ShipFilter {
    /// Whether no criterion is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Check every set criterion against a ship.
    pub fn matches(&self, ship: &Ship) -> bool {
        contains(&ship.name, self.name.as_deref())
            && contains(&ship.planet, self.planet.as_deref())
            && self.ship_type.is_none_or(|kind| ship.ship_type == kind)
            && self.after.is_none_or(|after| ship.prod_date > after)
            && self.before.is_none_or(|before| ship.prod_date < before)
            && self.is_used.is_none_or(|used| ship.is_used == used)
            && within(ship.speed, self.min_speed, self.max_speed)
            && within(ship.crew_size, self.min_crew_size, self.max_crew_size)
            && within(ship.rating, self.min_rating, self.max_rating)
    }
}

fn contains(value: &str, needle: Option<&str>) -> bool {
    needle.is_none_or(|needle| value.contains(needle))
}

fn within<T: PartialOrd>(value: T, min: Option<T>, max: Option<T>) -> bool {
    min.is_none_or(|min| value >= min) && max.is_none_or(|max| value <= max)
}

/// Keep the ships matching `filter`, preserving their order.
pub fn filter_ships(ships: Vec<Ship>, filter: &ShipFilter) -> Vec<Ship> {
    if filter.is_empty() {
        return ships;
    }
    ships
        .into_iter()
        .filter(|ship| filter.matches(ship))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{ShipFilter, filter_ships};
    use crate::domain::{Ship, ShipType};
    use chrono::{DateTime, TimeZone, Utc};

    fn year(year: i32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0).unwrap()
    }

    fn ship(id: i64, name: &str, planet: &str, speed: f64, crew_size: i32, rating: f64) -> Ship {
        Ship {
            id,
            name: name.to_string(),
            planet: planet.to_string(),
            ship_type: ShipType::Transport,
            prod_date: year(2900 + id as i32),
            is_used: id % 2 == 0,
            speed,
            crew_size,
            rating,
        }
    }

    fn fleet() -> Vec<Ship> {
        vec![
            ship(3, "Orion", "Mars", 0.3, 10, 0.5),
            ship(1, "Vega", "Earth", 0.1, 100, 1.5),
            ship(2, "Orion II", "Marsala", 0.5, 1000, 2.5),
            Ship {
                ship_type: ShipType::Military,
                ..ship(4, "Nova", "Venus", 0.9, 5000, 3.5)
            },
        ]
    }

    fn ids(ships: &[Ship]) -> Vec<i64> {
        ships.iter().map(|ship| ship.id).collect()
    }

    #[test]
    fn empty_filter_returns_everything_in_order() {
        let filtered = filter_ships(fleet(), &ShipFilter::default());

        assert_eq!(filtered, fleet());
    }

    #[test]
    fn substring_match_is_case_sensitive() {
        let filter = ShipFilter {
            name: Some("Orion".to_string()),
            ..ShipFilter::default()
        };
        assert_eq!(ids(&filter_ships(fleet(), &filter)), vec![3, 2]);

        let lower = ShipFilter {
            name: Some("orion".to_string()),
            ..ShipFilter::default()
        };
        assert!(filter_ships(fleet(), &lower).is_empty());
    }

    #[test]
    fn planet_substring_is_unanchored() {
        let filter = ShipFilter {
            planet: Some("ars".to_string()),
            ..ShipFilter::default()
        };

        assert_eq!(ids(&filter_ships(fleet(), &filter)), vec![3, 2]);
    }

    #[test]
    fn numeric_ranges_include_boundaries() {
        let speed = ShipFilter {
            min_speed: Some(0.1),
            max_speed: Some(0.5),
            ..ShipFilter::default()
        };
        assert_eq!(ids(&filter_ships(fleet(), &speed)), vec![3, 1, 2]);

        let crew = ShipFilter {
            min_crew_size: Some(100),
            max_crew_size: Some(1000),
            ..ShipFilter::default()
        };
        assert_eq!(ids(&filter_ships(fleet(), &crew)), vec![1, 2]);

        let rating = ShipFilter {
            min_rating: Some(2.5),
            ..ShipFilter::default()
        };
        assert_eq!(ids(&filter_ships(fleet(), &rating)), vec![2, 4]);
    }

    #[test]
    fn date_bounds_are_exclusive() {
        let filter = ShipFilter {
            after: Some(year(2901)),
            before: Some(year(2904)),
            ..ShipFilter::default()
        };

        assert_eq!(ids(&filter_ships(fleet(), &filter)), vec![3, 2]);
    }

    #[test]
    fn criteria_combine_conjunctively() {
        let filter = ShipFilter {
            ship_type: Some(ShipType::Transport),
            is_used: Some(false),
            min_speed: Some(0.2),
            ..ShipFilter::default()
        };

        assert_eq!(ids(&filter_ships(fleet(), &filter)), vec![3]);
    }

    #[test]
    fn ship_type_criterion_selects_class() {
        let filter = ShipFilter {
            ship_type: Some(ShipType::Military),
            ..ShipFilter::default()
        };

        assert_eq!(ids(&filter_ships(fleet(), &filter)), vec![4]);
        assert!(!filter.is_empty());
    }
}
