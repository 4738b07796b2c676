// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! A decorative field of floating dots, lines and squares.
//!
//! Each element has a static placement and a looping keyframe track. The
//! track waits out its delay once, then repeats forever. Sampling is a pure
//! function of time, so a renderer can evaluate any frame independently.

use super::easing::Easing;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Number of dots.
pub const DOT_COUNT: usize = 20;
/// Number of lines.
pub const LINE_COUNT: usize = 5;
/// Number of squares.
pub const SQUARE_COUNT: usize = 8;

/// What an element looks like.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// An 8px round dot.
    Dot,
    /// A 1px wide vertical gradient line.
    Line,
    /// A 16px outlined square.
    Square,
}

/// Evenly spaced keyframe values.
#[derive(Debug, Clone, PartialEq)]
pub struct Keyframes(pub Vec<f32>);

impl Keyframes {
    /// Samples at progress `p` in `[0, 1]`, easing within each segment.
    pub fn sample(&self, p: f32, easing: Easing) -> f32 {
        match self.0.as_slice() {
            [] => 0.0,
            [only] => *only,
            values => {
                let segments = (values.len() - 1) as f32;
                let scaled = p.clamp(0.0, 1.0) * segments;
                let index = (scaled.floor() as usize).min(values.len() - 2);
                let local = easing.apply(scaled - index as f32);
                values[index] + (values[index + 1] - values[index]) * local
            }
        }
    }
}

/// A looping animation.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    /// Length of one loop in seconds.
    pub duration: f32,
    /// Seconds before the first loop starts.
    pub delay: f32,
    /// Curve within each keyframe segment.
    pub easing: Easing,
    /// Vertical offset in pixels.
    pub translate_y: Option<Keyframes>,
    /// Opacity.
    pub opacity: Option<Keyframes>,
    /// Vertical scale.
    pub scale_y: Option<Keyframes>,
    /// Uniform scale.
    pub scale: Option<Keyframes>,
    /// Rotation in degrees.
    pub rotate: Option<Keyframes>,
}

impl Track {
    /// Loop progress in `[0, 1)` at `time` seconds.
    pub fn progress(&self, time: f32) -> f32 {
        let local = time - self.delay;
        if local <= 0.0 || self.duration <= 0.0 {
            return 0.0;
        }
        (local % self.duration) / self.duration
    }
}

/// Animated properties at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementPose {
    /// Vertical offset in pixels.
    pub translate_y: f32,
    /// Opacity.
    pub opacity: f32,
    /// Vertical scale.
    pub scale_y: f32,
    /// Uniform scale.
    pub scale: f32,
    /// Rotation in degrees.
    pub rotate: f32,
}

/// One element of the field.
#[derive(Debug, Clone, PartialEq)]
pub struct FloatingElement {
    /// Appearance.
    pub kind: ElementKind,
    /// Horizontal position as a percentage of the container width.
    pub left_percent: f32,
    /// Vertical position as a percentage of the container height.
    pub top_percent: f32,
    /// Opacity when the track does not animate it.
    pub base_opacity: f32,
    /// The loop.
    pub track: Track,
}

impl FloatingElement {
    /// Evaluates the element at `time` seconds.
    pub fn sample(&self, time: f32) -> ElementPose {
        let p = self.track.progress(time);
        let easing = self.track.easing;
        let value = |keys: &Option<Keyframes>, fallback: f32| {
            keys.as_ref().map_or(fallback, |keys| keys.sample(p, easing))
        };
        ElementPose {
            translate_y: value(&self.track.translate_y, 0.0),
            opacity: value(&self.track.opacity, self.base_opacity),
            scale_y: value(&self.track.scale_y, 1.0),
            scale: value(&self.track.scale, 1.0),
            rotate: value(&self.track.rotate, 0.0),
        }
    }
}

/// The full decorative field.
#[derive(Debug, Clone, PartialEq)]
pub struct FloatingField {
    elements: Vec<FloatingElement>,
}

impl FloatingField {
    /// Lays out the field; dot placement and timing come from `seed`.
    pub fn generate(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut elements = Vec::with_capacity(DOT_COUNT + LINE_COUNT + SQUARE_COUNT);

        for _ in 0..DOT_COUNT {
            elements.push(FloatingElement {
                kind: ElementKind::Dot,
                left_percent: rng.gen_range(0.0..100.0),
                top_percent: rng.gen_range(0.0..100.0),
                base_opacity: 0.3,
                track: Track {
                    duration: 3.0 + rng.gen_range(0.0..2.0),
                    delay: rng.gen_range(0.0..2.0),
                    easing: Easing::EaseInOut,
                    translate_y: Some(Keyframes(vec![0.0, -20.0, 0.0])),
                    opacity: Some(Keyframes(vec![0.3, 0.6, 0.3])),
                    scale_y: None,
                    scale: None,
                    rotate: None,
                },
            });
        }

        for i in 0..LINE_COUNT {
            let i = i as f32;
            elements.push(FloatingElement {
                kind: ElementKind::Line,
                left_percent: 20.0 + i * 15.0,
                top_percent: 10.0 + i * 20.0,
                base_opacity: 0.2,
                track: Track {
                    duration: 4.0,
                    delay: i * 0.5,
                    easing: Easing::EaseInOut,
                    translate_y: None,
                    opacity: Some(Keyframes(vec![0.0, 0.3, 0.0])),
                    scale_y: Some(Keyframes(vec![0.0, 1.0, 0.0])),
                    scale: None,
                    rotate: None,
                },
            });
        }

        for i in 0..SQUARE_COUNT {
            let i = i as f32;
            elements.push(FloatingElement {
                kind: ElementKind::Square,
                left_percent: 70.0 + i * 3.0,
                top_percent: 30.0 + i * 8.0,
                base_opacity: 0.2,
                track: Track {
                    duration: 8.0,
                    delay: i * 0.3,
                    easing: Easing::Linear,
                    translate_y: None,
                    opacity: None,
                    scale_y: None,
                    scale: Some(Keyframes(vec![1.0, 1.2, 1.0])),
                    rotate: Some(Keyframes(vec![0.0, 90.0, 180.0, 270.0, 360.0])),
                },
            });
        }

        Self { elements }
    }

    /// Every element.
    pub fn elements(&self) -> &[FloatingElement] {
        &self.elements
    }

    /// Elements of one kind.
    pub fn of_kind(&self, kind: ElementKind) -> impl Iterator<Item = &FloatingElement> {
        self.elements.iter().filter(move |element| element.kind == kind)
    }

    /// Evaluates every element at `time` seconds.
    pub fn sample(&self, time: f32) -> Vec<ElementPose> {
        self.elements.iter().map(|element| element.sample(time)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn field_has_the_expected_population() {
        let field = FloatingField::generate(7);
        assert_eq!(field.of_kind(ElementKind::Dot).count(), DOT_COUNT);
        assert_eq!(field.of_kind(ElementKind::Line).count(), LINE_COUNT);
        assert_eq!(field.of_kind(ElementKind::Square).count(), SQUARE_COUNT);
    }

    #[test]
    fn same_seed_same_layout() {
        assert_eq!(FloatingField::generate(42), FloatingField::generate(42));
    }

    #[test]
    fn dot_timing_stays_in_range() {
        let field = FloatingField::generate(3);
        for dot in field.of_kind(ElementKind::Dot) {
            assert!((3.0..5.0).contains(&dot.track.duration));
            assert!((0.0..2.0).contains(&dot.track.delay));
            assert!((0.0..100.0).contains(&dot.left_percent));
        }
    }

    #[test]
    fn lines_and_squares_follow_their_grid() {
        let field = FloatingField::generate(0);
        let lines: Vec<_> = field.of_kind(ElementKind::Line).collect();
        assert_relative_eq!(lines[2].left_percent, 50.0);
        assert_relative_eq!(lines[2].top_percent, 50.0);
        assert_relative_eq!(lines[2].track.delay, 1.0);
        let squares: Vec<_> = field.of_kind(ElementKind::Square).collect();
        assert_relative_eq!(squares[7].left_percent, 91.0);
        assert_relative_eq!(squares[7].top_percent, 86.0);
    }

    #[test]
    fn sampling_waits_for_the_delay_then_loops() {
        let field = FloatingField::generate(0);
        let square = field.of_kind(ElementKind::Square).nth(1).cloned();
        let square = square.expect("eight squares");
        // Delay 0.3s: still at the first keyframe.
        assert_relative_eq!(square.sample(0.2).rotate, 0.0);
        // A quarter loop in, linear rotation reaches 90 degrees.
        assert_relative_eq!(square.sample(0.3 + 2.0).rotate, 90.0, epsilon = 1e-3);
        assert_relative_eq!(square.sample(0.3 + 2.0).scale, 1.1, epsilon = 1e-3);
        // One full loop later the pose repeats.
        assert_relative_eq!(
            square.sample(0.3 + 2.0 + 8.0).rotate,
            square.sample(0.3 + 2.0).rotate,
            epsilon = 1e-3
        );
    }

    #[test]
    fn line_peaks_mid_loop() {
        let field = FloatingField::generate(0);
        let line = field.of_kind(ElementKind::Line).next().cloned();
        let line = line.expect("five lines");
        let pose = line.sample(2.0);
        assert_relative_eq!(pose.scale_y, 1.0, epsilon = 1e-4);
        assert_relative_eq!(pose.opacity, 0.3, epsilon = 1e-4);
    }
}
