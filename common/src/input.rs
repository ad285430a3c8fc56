//! Input adapters: the four ways a gauge value is updated before a refresh.
//!
//! | Adapter | Source | Rule |
//! |---------|--------|------|
//! | [`update_by_position`](Gauge::update_by_position) | Encoder detent index | `min + position * increment` |
//! | [`update_by_direction`](Gauge::update_by_direction) | Encoder step | `value ± increment` |
//! | [`update_by_angle`](Gauge::update_by_angle) | Touch on the dial | inverse angle mapping |
//! | [`update_by_value`](Gauge::update_by_value) | Peripheral / sensor | set directly |
//!
//! Every adapter recomputes the channel's angle through
//! [`angle_of`](crate::geometry::angle_of), except that an out-of-range absolute
//! value leaves the needle where it was and the renderer shows the error glyph.

use crate::gauge::{Channel, Direction, Gauge};
use crate::geometry::{angle_of, inverse_angle_of};
use crate::range::classify;

impl Gauge {
    /// Store the position index used by [`update_by_position`](Self::update_by_position).
    pub fn set_position(
        &mut self,
        channel: Channel,
        position: i32,
    ) {
        self.branch_mut(channel).position = position;
    }

    /// Store the step direction used by [`update_by_direction`](Self::update_by_direction).
    pub fn set_direction(
        &mut self,
        direction: Direction,
    ) {
        self.direction = direction;
    }

    /// `value = min + position * increment`.
    pub fn update_by_position(
        &mut self,
        channel: Channel,
    ) {
        let config = *self.config();
        let position = self.branch(channel).position;
        self.apply(channel, config.min + position as f32 * config.increment);
    }

    /// Step the value by one increment in the stored direction. `Hold` leaves the value alone.
    pub fn update_by_direction(
        &mut self,
        channel: Channel,
    ) {
        let increment = self.config().increment;
        let value = self.branch(channel).value;
        let next = match self.direction {
            Direction::Up => value + increment,
            Direction::Down => value - increment,
            Direction::Hold => value,
        };
        self.apply(channel, next);
    }

    /// Set the value under needle angle `angle`, then re-derive the angle from it.
    pub fn update_by_angle(
        &mut self,
        channel: Channel,
        angle: f32,
    ) {
        if !angle.is_finite() {
            return;
        }
        let value = inverse_angle_of(self.config(), angle);
        self.apply(channel, value);
    }

    /// Set the value directly, e.g. from a sensor reading or a peripheral ack.
    ///
    /// Out-of-range values are stored (so the range check sees them) but the
    /// needle keeps its last in-range angle. Non-finite readings are ignored.
    pub fn update_by_value(
        &mut self,
        channel: Channel,
        value: f32,
    ) {
        if !value.is_finite() {
            #[cfg(feature = "defmt")]
            defmt::warn!("{=str}: ignoring non-finite {} value", self.config().label, channel);
            return;
        }

        let config = *self.config();
        if classify(value, config.min, config.max).is_error() {
            self.branch_mut(channel).value = value;
        } else {
            self.apply(channel, value);
        }
    }

    fn apply(
        &mut self,
        channel: Channel,
        value: f32,
    ) {
        let angle = angle_of(self.config(), value);
        let branch = self.branch_mut(channel);
        branch.value = value;
        branch.angle = angle;
    }
}

#[cfg(test)]
mod tests {
    use embedded_graphics::prelude::Point;

    use crate::gauge::{Channel, Direction, Gauge, GaugeConfig};
    use crate::geometry::{angle_of, roughly_equal};

    fn test_gauge() -> Gauge { Gauge::new(GaugeConfig::new("TEST", Point::new(100, 100), 20.0, 50.0, 0.5, 1)).unwrap() }

    #[test]
    fn test_update_by_position() {
        let mut gauge = test_gauge();
        gauge.set_position(Channel::Target, 10);
        gauge.update_by_position(Channel::Target);

        assert_eq!(gauge.target().value(), 25.0);
        assert_eq!(gauge.target().angle(), angle_of(gauge.config(), 25.0));
        // Current untouched
        assert_eq!(gauge.current().value(), 20.0);
    }

    #[test]
    fn test_update_by_direction() {
        let mut gauge = test_gauge();
        gauge.set_direction(Direction::Up);
        gauge.update_by_direction(Channel::Current);
        gauge.update_by_direction(Channel::Current);
        assert_eq!(gauge.current().value(), 21.0);

        gauge.set_direction(Direction::Down);
        gauge.update_by_direction(Channel::Current);
        assert_eq!(gauge.current().value(), 20.5);

        gauge.set_direction(Direction::Hold);
        gauge.update_by_direction(Channel::Current);
        assert_eq!(gauge.current().value(), 20.5);
        assert_eq!(gauge.current().angle(), angle_of(gauge.config(), 20.5));
    }

    #[test]
    fn test_update_by_direction_can_leave_range() {
        let mut gauge = test_gauge();
        gauge.set_direction(Direction::Down);
        gauge.update_by_direction(Channel::Target);
        assert_eq!(gauge.target().value(), 19.5);
        assert!(gauge.target().angle() > 225.0);
    }

    #[test]
    fn test_update_by_angle_round_trips() {
        let mut gauge = test_gauge();
        gauge.update_by_angle(Channel::Target, 90.0);
        assert!(roughly_equal(gauge.target().value(), 35.0));
        assert!((gauge.target().angle() - 90.0).abs() < 0.01);
    }

    #[test]
    fn test_update_by_value_in_range() {
        let mut gauge = test_gauge();
        gauge.update_by_value(Channel::Current, 42.0);
        assert_eq!(gauge.current().value(), 42.0);
        assert_eq!(gauge.current().angle(), angle_of(gauge.config(), 42.0));
    }

    #[test]
    fn test_update_by_value_out_of_range_keeps_angle() {
        let mut gauge = test_gauge();
        gauge.update_by_value(Channel::Target, 30.0);
        let angle = gauge.target().angle();

        gauge.update_by_value(Channel::Target, 55.0);
        assert_eq!(gauge.target().value(), 55.0);
        assert_eq!(gauge.target().angle(), angle);
    }

    #[test]
    fn test_update_by_value_ignores_nan() {
        let mut gauge = test_gauge();
        gauge.update_by_value(Channel::Current, 30.0);
        gauge.update_by_value(Channel::Current, f32::NAN);
        assert_eq!(gauge.current().value(), 30.0);
    }
}
