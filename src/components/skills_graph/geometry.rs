use super::types::Point;

/// On-screen origin of the graph container.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContainerRect {
	pub left: f64,
	pub top: f64,
}

impl ContainerRect {
	/// Returns `None` while the container has not been laid out yet.
	pub fn measured(left: f64, top: f64, width: f64, height: f64) -> Option<Self> {
		(width > 0.0 && height > 0.0).then_some(Self { left, top })
	}

	pub fn to_local(&self, page: Point) -> Point {
		Point::new(page.x - self.left, page.y - self.top)
	}
}

/// Quadratic curve between two node centers, bowed along the left normal.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeCurve {
	pub start: Point,
	pub control: Point,
	pub end: Point,
}

impl EdgeCurve {
	pub fn between(start: Point, end: Point, ratio: f64, max_offset: f64) -> Self {
		let (dx, dy) = (end.x - start.x, end.y - start.y);
		let mid = Point::new((start.x + end.x) / 2.0, (start.y + end.y) / 2.0);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < f64::EPSILON {
			return Self {
				start,
				control: mid,
				end,
			};
		}
		let offset = (dist * ratio).min(max_offset);
		let (nx, ny) = (-dy / dist, dx / dist);
		Self {
			start,
			control: Point::new(mid.x + nx * offset, mid.y + ny * offset),
			end,
		}
	}

	/// The sub-curve covering `[0, t]`, used for the draw-in animation.
	pub fn truncated(&self, t: f64) -> Self {
		let t = t.clamp(0.0, 1.0);
		Self {
			start: self.start,
			control: Point::new(
				self.start.x + (self.control.x - self.start.x) * t,
				self.start.y + (self.control.y - self.start.y) * t,
			),
			end: self.point_at(t),
		}
	}

	pub fn point_at(&self, t: f64) -> Point {
		let omt = 1.0 - t;
		let (a, b, c) = (omt * omt, 2.0 * omt * t, t * t);
		Point::new(
			a * self.start.x + b * self.control.x + c * self.end.x,
			a * self.start.y + b * self.control.y + c * self.end.y,
		)
	}
}

pub fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t.clamp(0.0, 1.0)).powi(3)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn unmeasured_container_is_rejected() {
		assert!(ContainerRect::measured(10.0, 10.0, 0.0, 0.0).is_none());
		let rect = ContainerRect::measured(10.0, 20.0, 800.0, 700.0).unwrap();
		assert_eq!(rect.to_local(Point::new(60.0, 70.0)), Point::new(50.0, 50.0));
	}

	#[test]
	fn curve_bows_perpendicular_and_caps_offset() {
		let curve = EdgeCurve::between(Point::new(0.0, 0.0), Point::new(100.0, 0.0), 0.3, 50.0);
		assert_eq!(curve.control, Point::new(50.0, 30.0));

		let long = EdgeCurve::between(Point::new(0.0, 0.0), Point::new(1000.0, 0.0), 0.3, 50.0);
		assert_eq!(long.control, Point::new(500.0, 50.0));
	}

	#[test]
	fn curve_endpoints_match_nodes() {
		let curve = EdgeCurve::between(Point::new(3.0, 4.0), Point::new(-7.0, 12.0), 0.3, 50.0);
		assert_eq!(curve.point_at(0.0), curve.start);
		assert_eq!(curve.point_at(1.0), curve.end);
	}

	#[test]
	fn truncation_is_a_prefix_of_the_curve() {
		let curve = EdgeCurve::between(Point::new(0.0, 0.0), Point::new(100.0, 0.0), 0.3, 50.0);
		assert_eq!(curve.truncated(1.0), curve);
		let half = curve.truncated(0.5);
		assert_eq!(half.start, curve.start);
		assert_eq!(half.end, curve.point_at(0.5));
		assert_eq!(half.control, Point::new(25.0, 15.0));
	}

	#[test]
	fn coincident_endpoints_do_not_produce_nan() {
		let p = Point::new(5.0, 5.0);
		let curve = EdgeCurve::between(p, p, 0.3, 50.0);
		assert_eq!(curve.control, p);
	}
}
