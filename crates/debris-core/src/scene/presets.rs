#![forbid(unsafe_code)]

//! Built-in scenes.
//!
//! [`hero_explosion`] is the landing-page hero: a video that slides into the
//! centre and zooms, a red landing pad, two question captions, and twelve
//! images (four primary, four secondary, four side) that explode outward
//! and come to rest as debris.

use crate::graph::{CombineOp, GraphBuilder, GraphError, Mapping, ParamId, Source};
use crate::scatter::ScatterRule;
use crate::transform::{Channel, TransformGroup};

use super::Scene;

/// Debris families, in scene order.
pub const DEBRIS_FAMILIES: [&str; 3] = ["primary", "secondary", "side"];

const BURST_STOPS: [f64; 7] = [0.0, 0.25, 0.3, 0.35, 0.45, 0.7, 1.0];
const SECONDARY_STOPS: [f64; 6] = [0.0, 0.25, 0.35, 0.45, 0.7, 1.0];
const PAD_STOPS: [f64; 5] = [0.0, 0.35, 0.55, 0.75, 1.0];
const CAPTION_STOPS: [f64; 7] = [0.0, 0.18, 0.35, 0.52, 0.7, 0.88, 1.0];
const DEPTH_STOPS: [f64; 4] = [0.0, 0.5, 0.55, 0.65];

/// Output tables for one debris image, sharing one input table.
struct DebrisTrack {
    x: &'static [f64],
    y: &'static [f64],
    rotate: &'static [f64],
    opacity: &'static [f64],
    scale: &'static [f64],
    skew_x: &'static [f64],
    skew_y: &'static [f64],
    depth: bool,
}

const PRIMARY: [DebrisTrack; 4] = [
    DebrisTrack {
        x: &[0.0, 0.0, -180.0, -320.0, -420.0, -480.0, -480.0],
        y: &[0.0, 0.0, 20.0, -80.0, -140.0, -180.0, -180.0],
        rotate: &[0.0, 0.0, -120.0, -240.0, -450.0, -480.0, -480.0],
        opacity: &[1.0, 1.0, 0.8, 0.5, 0.45, 0.5, 0.5],
        scale: &[1.0, 1.0, 0.8, 0.5, 0.3, 0.25, 0.25],
        skew_x: &[0.0, 0.0, 3.0, 8.0, 12.0, 15.0, 15.0],
        skew_y: &[0.0, 0.0, -4.0, -9.0, -12.0, -14.0, -14.0],
        depth: false,
    },
    DebrisTrack {
        x: &[0.0, 0.0, 200.0, 380.0, 520.0, 600.0, 600.0],
        y: &[0.0, 0.0, -40.0, -150.0, -220.0, -260.0, -260.0],
        rotate: &[0.0, 0.0, 25.0, 45.0, 75.0, 85.0, 85.0],
        opacity: &[1.0, 1.0, 0.8, 0.4, 0.35, 0.4, 0.4],
        scale: &[1.0, 1.0, 1.5, 2.2, 1.0, 0.4, 0.4],
        skew_x: &[0.0, 0.0, -4.0, -10.0, -15.0, -17.0, -17.0],
        skew_y: &[0.0, 0.0, 5.0, 11.0, 15.0, 16.0, 16.0],
        depth: true,
    },
    DebrisTrack {
        x: &[0.0, 0.0, -200.0, -380.0, -500.0, -580.0, -580.0],
        y: &[0.0, 0.0, 80.0, 180.0, 250.0, 280.0, 280.0],
        rotate: &[0.0, 0.0, 450.0, 900.0, 1800.0, 1900.0, 1900.0],
        opacity: &[1.0, 1.0, 0.8, 0.3, 0.4, 0.45, 0.45],
        scale: &[1.0, 1.0, 0.8, 0.5, 0.3, 0.2, 0.2],
        skew_x: &[0.0, 0.0, 6.0, 12.0, 17.0, 20.0, 20.0],
        skew_y: &[0.0, 0.0, -7.0, -15.0, -20.0, -22.0, -22.0],
        depth: false,
    },
    DebrisTrack {
        x: &[0.0, 0.0, 220.0, 420.0, 580.0, 680.0, 680.0],
        y: &[0.0, 0.0, 60.0, 140.0, 200.0, 230.0, 230.0],
        rotate: &[0.0, 0.0, -25.0, -50.0, -90.0, -100.0, -100.0],
        opacity: &[1.0, 1.0, 0.8, 0.4, 0.5, 0.6, 0.6],
        scale: &[1.0, 1.0, 1.5, 2.2, 0.8, 0.35, 0.35],
        skew_x: &[0.0, 0.0, -5.0, -11.0, -16.0, -19.0, -19.0],
        skew_y: &[0.0, 0.0, 6.0, 14.0, 19.0, 21.0, 21.0],
        depth: true,
    },
];

const SECONDARY: [DebrisTrack; 4] = [
    DebrisTrack {
        x: &[0.0, -60.0, -140.0, -200.0, -240.0, -240.0],
        y: &[0.0, 30.0, -40.0, -90.0, -120.0, -120.0],
        rotate: &[0.0, -40.0, -110.0, -170.0, -190.0, -190.0],
        opacity: &[1.0, 1.0, 0.85, 0.6, 0.55, 0.55],
        scale: &[1.0, 1.0, 0.9, 0.65, 0.5, 0.5],
        skew_x: &[0.0, -2.0, -6.0, -10.0, -12.0, -12.0],
        skew_y: &[0.0, 3.0, 7.0, 11.0, 13.0, 13.0],
        depth: false,
    },
    DebrisTrack {
        x: &[0.0, 120.0, 250.0, 360.0, 450.0, 450.0],
        y: &[0.0, 20.0, -60.0, -110.0, -135.0, -135.0],
        rotate: &[0.0, 30.0, 90.0, 150.0, 180.0, 180.0],
        opacity: &[1.0, 1.0, 0.8, 0.55, 0.5, 0.5],
        scale: &[1.0, 1.0, 1.1, 0.75, 0.55, 0.55],
        skew_x: &[0.0, 2.0, 6.0, 10.0, 12.0, 12.0],
        skew_y: &[0.0, -3.0, -7.0, -11.0, -12.0, -12.0],
        depth: false,
    },
    DebrisTrack {
        x: &[0.0, -80.0, -160.0, -240.0, -300.0, -300.0],
        y: &[0.0, 40.0, 120.0, 180.0, 210.0, 210.0],
        rotate: &[0.0, 200.0, 360.0, 520.0, 540.0, 540.0],
        opacity: &[1.0, 1.0, 0.8, 0.45, 0.45, 0.45],
        scale: &[1.0, 1.0, 0.85, 0.55, 0.4, 0.4],
        skew_x: &[0.0, -4.0, -9.0, -13.0, -15.0, -15.0],
        skew_y: &[0.0, 5.0, 11.0, 15.0, 17.0, 17.0],
        depth: false,
    },
    DebrisTrack {
        x: &[0.0, 160.0, 320.0, 460.0, 560.0, 560.0],
        y: &[0.0, 10.0, 80.0, 140.0, 170.0, 170.0],
        rotate: &[0.0, -220.0, -380.0, -520.0, -560.0, -560.0],
        opacity: &[1.0, 1.0, 0.78, 0.5, 0.5, 0.5],
        scale: &[1.0, 1.0, 1.05, 0.7, 0.48, 0.48],
        skew_x: &[0.0, 5.0, 10.0, 15.0, 17.0, 17.0],
        skew_y: &[0.0, -6.0, -12.0, -16.0, -18.0, -18.0],
        depth: false,
    },
];

const SIDE: [DebrisTrack; 4] = [
    DebrisTrack {
        x: &[0.0, 0.0, -150.0, -300.0, -375.0, -400.0, -400.0],
        y: &[0.0, 0.0, -90.0, -175.0, -225.0, -250.0, -250.0],
        rotate: &[0.0, 0.0, -60.0, -120.0, -240.0, -270.0, -270.0],
        opacity: &[1.0, 1.0, 0.8, 0.5, 0.45, 0.5, 0.5],
        scale: &[1.0, 1.0, 0.9, 0.6, 0.4, 0.35, 0.35],
        skew_x: &[0.0, 0.0, 8.0, 18.0, 25.0, 28.0, 28.0],
        skew_y: &[0.0, 0.0, -10.0, -20.0, -28.0, -30.0, -30.0],
        depth: false,
    },
    DebrisTrack {
        x: &[0.0, 0.0, -200.0, -375.0, -475.0, -525.0, -525.0],
        y: &[0.0, 0.0, 110.0, 225.0, 300.0, 325.0, 325.0],
        rotate: &[0.0, 0.0, 120.0, 240.0, 450.0, 500.0, 500.0],
        opacity: &[1.0, 1.0, 0.8, 0.4, 0.4, 0.45, 0.45],
        scale: &[1.0, 1.0, 0.85, 0.5, 0.35, 0.3, 0.3],
        skew_x: &[0.0, 0.0, -10.0, -22.0, -30.0, -35.0, -35.0],
        skew_y: &[0.0, 0.0, 15.0, 30.0, 40.0, 45.0, 45.0],
        depth: false,
    },
    DebrisTrack {
        x: &[0.0, 0.0, 175.0, 325.0, 425.0, 475.0, 475.0],
        y: &[0.0, 0.0, -100.0, -200.0, -275.0, -300.0, -300.0],
        rotate: &[0.0, 0.0, 80.0, 160.0, 300.0, 340.0, 340.0],
        opacity: &[1.0, 1.0, 0.8, 0.5, 0.5, 0.55, 0.55],
        scale: &[1.0, 1.0, 0.95, 0.7, 0.45, 0.4, 0.4],
        skew_x: &[0.0, 0.0, -12.0, -25.0, -35.0, -40.0, -40.0],
        skew_y: &[0.0, 0.0, 8.0, 18.0, 25.0, 28.0, 28.0],
        depth: false,
    },
    DebrisTrack {
        x: &[0.0, 0.0, 225.0, 400.0, 500.0, 550.0, 550.0],
        y: &[0.0, 0.0, 125.0, 250.0, 325.0, 360.0, 360.0],
        rotate: &[0.0, 0.0, -140.0, -280.0, -550.0, -600.0, -600.0],
        opacity: &[1.0, 1.0, 0.8, 0.4, 0.45, 0.5, 0.5],
        scale: &[1.0, 1.0, 0.9, 0.55, 0.35, 0.3, 0.3],
        skew_x: &[0.0, 0.0, 10.0, 22.0, 32.0, 38.0, 38.0],
        skew_y: &[0.0, 0.0, -12.0, -25.0, -35.0, -40.0, -40.0],
        depth: false,
    },
];

struct Caption {
    name: &'static str,
    y_offset: &'static [f64],
    x: &'static [f64],
    opacity_at: &'static [f64],
    opacity: &'static [f64],
    scale: &'static [f64],
    rotate: &'static [f64],
}

const CAPTIONS: [Caption; 2] = [
    Caption {
        name: "design",
        y_offset: &[0.0, 160.0, 280.0, 160.0, -120.0, -320.0, -520.0],
        x: &[0.0, -20.0, -40.0, -120.0, -220.0, -320.0, -360.0],
        opacity_at: &[0.0, 0.08, 0.2, 0.4, 0.6, 0.75, 0.9, 1.0],
        opacity: &[0.0, 0.4, 0.9, 1.0, 1.0, 0.95, 0.5, 0.0],
        scale: &[0.7, 0.85, 1.0, 1.08, 1.15, 1.05, 0.85],
        rotate: &[-4.0, -2.0, 0.0, -6.0, -12.0, -16.0, -18.0],
    },
    Caption {
        name: "functionality",
        y_offset: &[0.0, 180.0, 320.0, 180.0, -140.0, -340.0, -540.0],
        x: &[0.0, 10.0, 0.0, 140.0, 260.0, 360.0, 420.0],
        opacity_at: &[0.0, 0.1, 0.25, 0.45, 0.65, 0.8, 0.95, 1.0],
        opacity: &[0.0, 0.4, 0.9, 1.0, 1.0, 0.9, 0.5, 0.0],
        scale: &[0.75, 0.88, 1.0, 1.12, 1.2, 1.05, 0.9],
        rotate: &[6.0, 3.0, 0.0, 8.0, 16.0, 18.0, 20.0],
    },
];

/// Shared 3-D depth parameters for the images that fly at the viewer.
struct Depth {
    rotate_x: ParamId,
    rotate_y: ParamId,
    z: ParamId,
}

fn debris_group(
    b: &mut GraphBuilder,
    family: &str,
    index: usize,
    stops: &[f64],
    track: &DebrisTrack,
    rule: ScatterRule,
    depth: &Depth,
) -> Result<TransformGroup, GraphError> {
    let name = format!("{family}.{index}");
    let mut channel = |suffix: &str, output: &[f64]| {
        b.track_table(format!("{name}.{suffix}"), Source::Progress, stops, output)
    };
    let mut group = TransformGroup::new(name.clone())
        .bind(Channel::X, channel("x", track.x)?)
        .bind(Channel::Y, channel("y", track.y)?)
        .bind(Channel::Rotate, channel("rotate", track.rotate)?)
        .bind(Channel::Opacity, channel("opacity", track.opacity)?)
        .bind(Channel::Scale, channel("scale", track.scale)?)
        .bind(Channel::SkewX, channel("skew_x", track.skew_x)?)
        .bind(Channel::SkewY, channel("skew_y", track.skew_y)?)
        .scatter(rule);
    if track.depth {
        group = group
            .bind(Channel::RotateX, depth.rotate_x)
            .bind(Channel::RotateY, depth.rotate_y)
            .bind(Channel::Z, depth.z);
    }
    Ok(group)
}

/// The landing-page hero scene.
///
/// Parameters are named `<group>.<channel>`; the video additionally exposes
/// `video.glow` and `video.red_tint`, and the pad `pad.scale_y` and
/// `pad.shadow_alpha`, which have no transform channel.
pub fn hero_explosion() -> Result<Scene, GraphError> {
    let mut b = GraphBuilder::new();
    let mut groups = Vec::with_capacity(16);

    let question = b.track(
        "question.progress",
        Source::Progress,
        &[(0.5, 0.0), (0.65, 0.3), (0.85, 1.0), (1.0, 1.0)],
    )?;

    let video_y = b.track_table(
        "video.y",
        Source::Progress,
        &[0.0, 0.25, 0.35, 0.45, 0.55, 0.65, 0.85, 1.0],
        &[200.0, 50.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
    )?;
    let video_opacity = b.track_table(
        "video.opacity",
        Source::Progress,
        &[0.0, 0.15, 0.25, 0.35, 0.45, 0.55, 0.65, 0.75, 0.85, 0.95, 1.0],
        &[0.3, 0.6, 0.85, 0.95, 1.0, 0.8, 0.5, 0.2, 0.0, 0.0, 0.0],
    )?;
    let video_scale = b.track_table(
        "video.scale",
        Source::Progress,
        &[0.0, 0.15, 0.2, 0.25, 0.35, 0.45, 0.55, 0.65, 0.75, 0.85, 0.95, 1.0],
        &[0.4, 0.5, 0.6, 0.7, 0.9, 1.2, 1.8, 2.5, 3.5, 4.5, 5.0, 5.5],
    )?;
    b.track_table(
        "video.glow",
        Source::Progress,
        &[0.0, 0.45, 0.6, 0.7, 0.75, 0.8, 0.85, 0.9, 1.0],
        &[0.0, 0.05, 0.2, 0.35, 0.45, 0.55, 0.65, 0.75, 0.85],
    )?;
    b.track_table(
        "video.red_tint",
        Source::Progress,
        &[0.0, 0.45, 0.5, 0.55, 0.6, 0.65, 0.7, 0.75, 0.8, 0.85, 0.9, 0.95, 1.0],
        &[0.0, 0.0, 0.15, 0.25, 0.35, 0.45, 0.55, 0.65, 0.7, 0.75, 0.8, 0.85, 0.9],
    )?;
    groups.push(
        TransformGroup::new("video")
            .bind(Channel::Y, video_y)
            .bind(Channel::Opacity, video_opacity)
            .bind(Channel::Scale, video_scale),
    );

    let pad = TransformGroup::new("pad")
        .bind(
            Channel::X,
            b.track_table("pad.x", Source::Progress, &PAD_STOPS, &[-420.0, -240.0, -140.0, -80.0, -60.0])?,
        )
        .bind(
            Channel::Y,
            b.track_table("pad.y", Source::Progress, &PAD_STOPS, &[-320.0, -140.0, 20.0, 190.0, 250.0])?,
        )
        .bind(
            Channel::Scale,
            b.track_table("pad.scale_x", Source::Progress, &PAD_STOPS, &[0.75, 0.9, 1.25, 1.65, 1.85])?,
        )
        .bind(
            Channel::Rotate,
            b.track_table("pad.rotate", Source::Progress, &PAD_STOPS, &[32.0, 24.0, 16.0, 9.0, 4.0])?,
        )
        .bind(
            Channel::SkewX,
            b.track_table("pad.skew_x", Source::Progress, &PAD_STOPS, &[10.0, 8.0, 6.0, 4.0, 3.0])?,
        )
        .bind(
            Channel::Opacity,
            b.track_table(
                "pad.opacity",
                Source::Progress,
                &[0.18, 0.3, 0.65, 1.0],
                &[0.0, 0.55, 0.85, 0.75],
            )?,
        );
    b.track_table("pad.scale_y", Source::Progress, &PAD_STOPS, &[1.1, 1.0, 0.75, 0.38, 0.28])?;
    b.param(
        "pad.shadow_alpha",
        Source::Progress,
        Mapping::Affine {
            scale: 0.22,
            offset: 0.18,
        },
    )?;
    groups.push(pad);

    for caption in &CAPTIONS {
        let name = caption.name;
        let q = Source::Param(question);
        let offset = b.track_table(
            format!("{name}.y_offset"),
            q.clone(),
            &CAPTION_STOPS,
            caption.y_offset,
        )?;
        let y = b.param(
            format!("{name}.y"),
            Source::Combine(CombineOp::Sum, vec![video_y, offset]),
            Mapping::Identity,
        )?;
        groups.push(
            TransformGroup::new(name)
                .bind(Channel::Y, y)
                .bind(
                    Channel::X,
                    b.track_table(format!("{name}.x"), q.clone(), &CAPTION_STOPS, caption.x)?,
                )
                .bind(
                    Channel::Opacity,
                    b.track_table(
                        format!("{name}.opacity"),
                        q.clone(),
                        caption.opacity_at,
                        caption.opacity,
                    )?,
                )
                .bind(
                    Channel::Scale,
                    b.track_table(format!("{name}.scale"), q.clone(), &CAPTION_STOPS, caption.scale)?,
                )
                .bind(
                    Channel::Rotate,
                    b.track_table(format!("{name}.rotate"), q, &CAPTION_STOPS, caption.rotate)?,
                ),
        );
    }

    let depth = Depth {
        rotate_x: b.track_table("depth.rotate_x", Source::Progress, &DEPTH_STOPS, &[0.0, 0.0, 10.0, 20.0])?,
        rotate_y: b.track_table("depth.rotate_y", Source::Progress, &DEPTH_STOPS, &[0.0, 0.0, 5.0, 10.0])?,
        z: b.track_table("depth.z", Source::Progress, &DEPTH_STOPS, &[0.0, 0.0, 500.0, 800.0])?,
    };

    for (i, track) in PRIMARY.iter().enumerate() {
        groups.push(debris_group(
            &mut b,
            "primary",
            i,
            &BURST_STOPS,
            track,
            ScatterRule::primary(i),
            &depth,
        )?);
    }
    for (i, track) in SECONDARY.iter().enumerate() {
        groups.push(debris_group(
            &mut b,
            "secondary",
            i,
            &SECONDARY_STOPS,
            track,
            ScatterRule::secondary(i),
            &depth,
        )?);
    }
    for (i, track) in SIDE.iter().enumerate() {
        groups.push(debris_group(
            &mut b,
            "side",
            i,
            &BURST_STOPS,
            track,
            ScatterRule::side(i),
            &depth,
        )?);
    }

    Scene::new(b.build(), groups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Viewport;
    use crate::scatter::ScatterBounds;

    #[test]
    fn hero_builds_with_twelve_debris_groups() {
        let scene = hero_explosion().unwrap();
        assert_eq!(scene.groups().len(), 16);
        assert_eq!(scene.debris_groups().count(), 12);
        for family in DEBRIS_FAMILIES {
            for i in 0..4 {
                let name = format!("{family}.{i}");
                assert!(scene.group(&name).is_some_and(|g| g.is_debris()), "{name}");
            }
        }
    }

    #[test]
    fn captions_follow_video_offset() {
        let scene = hero_explosion().unwrap();
        let g = scene.graph();
        let v = scene.evaluate(0.0);
        // Question progress is 0 before 0.5, so the caption sits at the video offset.
        assert_eq!(v.get(g.lookup("design.y").unwrap()), Some(200.0));
        assert_eq!(v.get(g.lookup("functionality.y").unwrap()), Some(200.0));
        let end = scene.evaluate(1.0);
        assert_eq!(end.get(g.lookup("design.y").unwrap()), Some(-520.0));
        assert_eq!(end.get(g.lookup("design.opacity").unwrap()), Some(0.0));
    }

    #[test]
    fn terminal_values_match_tables() {
        let scene = hero_explosion().unwrap();
        let values = scene.evaluate(1.0);
        let p0 = scene.transform("primary.0", &values).unwrap();
        assert_eq!((p0.x, p0.y, p0.rotate, p0.scale), (-480.0, -180.0, -480.0, 0.25));
        assert_eq!(p0.z, 0.0);
        let p1 = scene.transform("primary.1", &values).unwrap();
        assert_eq!((p1.rotate_x, p1.rotate_y, p1.z), (20.0, 10.0, 800.0));
        let video = scene.transform("video", &values).unwrap();
        assert_eq!(video.opacity, 0.0);
        assert_eq!(video.scale, 5.5);
        let alpha = scene.graph().lookup("pad.shadow_alpha").unwrap();
        assert!((values.get(alpha).unwrap() - 0.40).abs() < 1e-12);
    }

    #[test]
    fn scattered_debris_is_bounded_and_distinct() {
        let scene = hero_explosion().unwrap();
        let values = scene.evaluate(1.0);
        let base = ScatterBounds::default();
        for viewport in [Viewport::FALLBACK, Viewport::new(1280.0, 720.0), Viewport::new(800.0, 1200.0)] {
            let mut positions = Vec::new();
            for group in scene.debris_groups() {
                let rule = group.scatter_rule().unwrap();
                let rest = rule.apply(&group.resolve(&values), viewport, &base);
                assert!(rule.bounds(viewport, &base).contains(rest.x, rest.y));
                assert!(rest.is_finite());
                positions.push((rest.x, rest.y));
            }
            for (i, a) in positions.iter().enumerate() {
                for b in &positions[i + 1..] {
                    assert_ne!(a, b, "viewport {viewport:?}");
                }
            }
        }
    }
}
