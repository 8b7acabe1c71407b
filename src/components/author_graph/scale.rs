//! Zoom-dependent scaling configuration for graph visuals.
//!
//! Node boxes live in world space and grow with zoom. Strokes, arrowheads and
//! fonts are expressed in screen pixels and converted to world units for the
//! current zoom level `k`, optionally clamped.
//!
//! - [`ScaleBehavior::Screen`]: constant pixel size.
//! - [`ScaleBehavior::Clamped`]: world size bounded by min/max pixel sizes.

/// Defines how a visual property scales with zoom level.
#[derive(Clone, Debug)]
pub enum ScaleBehavior {
	Screen,
	/// `(min_screen_px, max_screen_px)`; use infinities for unbounded.
	Clamped { min_screen: f64, max_screen: f64 },
}

impl ScaleBehavior {
	/// World-space value for `base` at zoom `k`, ready for drawing after the
	/// canvas transform has been applied.
	pub fn apply(&self, base: f64, k: f64) -> f64 {
		match self {
			ScaleBehavior::Screen => base / k,
			ScaleBehavior::Clamped {
				min_screen,
				max_screen,
			} => base.clamp(min_screen / k, max_screen / k),
		}
	}
}

/// Opacity ramp over zoom: fully visible at `full_alpha_k`, invisible at
/// `zero_alpha_k`.
#[derive(Clone, Debug)]
pub struct AlphaFade {
	pub zero_alpha_k: f64,
	pub full_alpha_k: f64,
}

impl AlphaFade {
	pub fn apply(&self, k: f64) -> f64 {
		if self.zero_alpha_k == self.full_alpha_k {
			return 1.0;
		}
		((k - self.zero_alpha_k) / (self.full_alpha_k - self.zero_alpha_k)).clamp(0.0, 1.0)
	}
}

#[derive(Clone, Debug)]
pub struct EdgeScaleConfig {
	/// Line width in world units.
	pub line_width: f64,
	pub width_behavior: ScaleBehavior,
	/// Dash pattern (dash, gap) in world units for animated edges.
	pub dash_pattern: (f64, f64),
	/// Flow animation speed (world units per second).
	pub flow_speed: f64,
	/// Edge label font size in world units.
	pub label_size: f64,
	/// Labels fade out when zoomed far out.
	pub label_alpha: AlphaFade,
}

#[derive(Clone, Debug)]
pub struct ArrowScaleConfig {
	/// Arrowhead length in world units.
	pub size: f64,
	pub size_behavior: ScaleBehavior,
}

#[derive(Clone, Debug)]
pub struct NodeScaleConfig {
	/// Title font size in world units.
	pub title_size: f64,
	/// Year font size in world units.
	pub year_size: f64,
	/// Extra border width on the hovered node.
	pub hover_border: f64,
	pub hover_border_behavior: ScaleBehavior,
}

/// Complete scale configuration for all graph elements.
#[derive(Clone, Debug)]
pub struct ScaleConfig {
	pub node: NodeScaleConfig,
	pub edge: EdgeScaleConfig,
	pub arrow: ArrowScaleConfig,
	/// Zoom limits for wheel and control buttons.
	pub min_zoom: f64,
	pub max_zoom: f64,
}

impl Default for ScaleConfig {
	fn default() -> Self {
		Self {
			node: NodeScaleConfig {
				title_size: 13.0,
				year_size: 11.0,
				hover_border: 1.5,
				hover_border_behavior: ScaleBehavior::Screen,
			},
			edge: EdgeScaleConfig {
				line_width: 2.0,
				width_behavior: ScaleBehavior::Clamped {
					min_screen: 1.0,
					max_screen: 4.0,
				},
				dash_pattern: (6.0, 4.0),
				flow_speed: 20.0,
				label_size: 11.0,
				label_alpha: AlphaFade {
					zero_alpha_k: 0.35,
					full_alpha_k: 0.6,
				},
			},
			arrow: ArrowScaleConfig {
				size: 10.0,
				size_behavior: ScaleBehavior::Clamped {
					min_screen: 4.0,
					max_screen: 18.0,
				},
			},
			min_zoom: 0.1,
			max_zoom: 10.0,
		}
	}
}

/// Pre-computed scale values for a specific zoom level.
///
/// Create this once per frame and pass it to rendering functions.
#[derive(Clone, Debug)]
pub struct ScaledValues {
	pub edge_line_width: f64,
	pub arrow_size: f64,
	pub label_alpha: f64,
	pub title_font: String,
	pub year_font: String,
	pub label_font: String,
	pub hover_border: f64,
}

impl ScaledValues {
	pub fn new(config: &ScaleConfig, k: f64) -> Self {
		Self {
			edge_line_width: config.edge.width_behavior.apply(config.edge.line_width, k),
			arrow_size: config.arrow.size_behavior.apply(config.arrow.size, k),
			label_alpha: config.edge.label_alpha.apply(k),
			title_font: format!("600 {}px sans-serif", config.node.title_size),
			year_font: format!("{}px sans-serif", config.node.year_size),
			label_font: format!("{}px sans-serif", config.edge.label_size),
			hover_border: config.node.hover_border_behavior.apply(config.node.hover_border, k),
		}
	}

	/// Dash offset for the flow animation at `flow_time` seconds.
	pub fn dash_offset(&self, flow_time: f64, flow_speed: f64) -> f64 {
		-flow_time * flow_speed
	}
}
