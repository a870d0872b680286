use glam::DVec3;

use super::{RenderRequest, RendererT, EMISSION_SCALE};
use crate::{
    camera::CameraSpec,
    core::{color::Color, mesh::Mesh, project::CONTENT_MARKER},
    light::{AreaLight, PointLight},
};

const GENERATOR: &str = env!("CARGO_PKG_NAME");

const TEMPLATE: &str = concat!(
    "<cycles>\n",
    "    <background>\n",
    "        <background name=\"bg\" strength=\"1.0\" color=\"0.2, 0.2, 0.2\"/>\n",
    "        <connect from=\"bg background\" to=\"output surface\"/>\n",
    "    </background>\n",
    "<!-- RaytracingContent -->\n",
    "</cycles>\n",
);

/// Cycles standalone XML scene format.
#[derive(Debug, Clone, Copy, Default)]
pub struct CyclesRenderer;

fn vec3(v: DVec3) -> String {
    format!("{} {} {}", v.x, v.y, v.z)
}

fn emission_shader(kind: &str, name: &str, color: Color, power: f64) -> String {
    format!(
        r#"
    <!-- Generated by {g} - {k} '{n}' -->
    <shader name="{n}_shader">
        <emission name="{n}_emit"
                  color="{r} {gr} {b}"
                  strength="{s}"/>
        <connect from="{n}_emit emission"
                 to="output surface"/>
    </shader>"#,
        g = GENERATOR,
        k = kind,
        n = name,
        r = color.r,
        gr = color.g,
        b = color.b,
        s = power * EMISSION_SCALE,
    )
}

impl RendererT for CyclesRenderer {
    fn preference_name(&self) -> &'static str {
        "Cycles"
    }

    fn template(&self) -> &'static str {
        debug_assert!(TEMPLATE.contains(CONTENT_MARKER));
        TEMPLATE
    }

    fn closing_tag(&self) -> Option<&'static str> {
        Some("</cycles>")
    }

    fn write_camera(&self, camera: &CameraSpec) -> String {
        // Cycles cameras look down +Z, hence the mirrored z scale
        format!(
            r#"
    <!-- Generated by {g} - Camera '{n}' -->
    <transform rotate="{a} {r}"
               translate="{p}"
               scale="1 1 -1">
        <camera type="perspective"/>
    </transform>"#,
            g = GENERATOR,
            n = camera.name,
            a = camera.rotation.angle().to_degrees(),
            r = vec3(camera.rotation.axis()),
            p = vec3(camera.position),
        )
    }

    fn write_object(&self, name: &str, mesh: &Mesh, color: Color, opacity: f64) -> String {
        let mut snippet = format!(
            r#"
    <!-- Generated by {g} - Object '{n}' -->
    <shader name="{n}_mat">
        <diffuse_bsdf name="{n}_bsdf" color="{r}, {gr}, {b}"/>"#,
            g = GENERATOR,
            n = name,
            r = color.r,
            gr = color.g,
            b = color.b,
        );

        if opacity < 1.0 {
            snippet += &format!(
                r#"
        <transparent_bsdf name="{n}_trans" color="1.0, 1.0, 1.0"/>
        <mix_closure name="{n}_mix" fac="{a}"/>
        <connect from="{n}_trans bsdf"  to="{n}_mix closure1"/>
        <connect from="{n}_bsdf bsdf"   to="{n}_mix closure2"/>
        <connect from="{n}_mix closure" to="output surface"/>
    </shader>"#,
                n = name,
                a = opacity,
            );
        } else {
            snippet += &format!(
                r#"
        <connect from="{n}_bsdf bsdf"   to="output surface"/>
    </shader>"#,
                n = name,
            );
        }

        let points = mesh
            .vertices()
            .iter()
            .map(|&p| vec3(p))
            .collect::<Vec<_>>()
            .join("  ");
        let verts = mesh
            .faces()
            .iter()
            .map(|f| format!("{} {} {}", f[0], f[1], f[2]))
            .collect::<Vec<_>>()
            .join("  ");
        let nverts = vec!["3"; mesh.faces().len()].join("  ");

        snippet += &format!(
            r#"
    <state shader="{n}_mat">
        <mesh P="{p}"
              nverts="{i}"
              verts="{v}"/>
    </state>
"#,
            n = name,
            p = points,
            i = nverts,
            v = verts,
        );

        snippet
    }

    fn write_pointlight(&self, light: &PointLight) -> String {
        emission_shader("Pointlight", &light.name, light.color, light.power)
            + &format!(
                r#"
    <state shader="{n}_shader">
        <light type="point"
               co="{p}"
               strength="1 1 1"/>
    </state>
"#,
                n = light.name,
                p = vec3(light.location),
            )
    }

    fn write_arealight(&self, light: &AreaLight) -> String {
        let (axis_u, axis_v, direction) = light.axes();
        emission_shader("Area light", &light.name, light.color, light.power)
            + &format!(
                r#"
    <state shader="{n}_shader">
        <light type="area"
               co="{p}"
               strength="1 1 1"
               axisu="{u}"
               axisv="{v}"
               sizeu="{a}"
               sizev="{b}"
               size="1"
               dir="{d}" />
    </state>
"#,
                n = light.name,
                p = vec3(light.placement.base),
                u = vec3(axis_u),
                v = vec3(axis_v),
                a = light.size_u,
                b = light.size_v,
                d = vec3(direction),
            )
    }

    fn render_args(&self, request: &RenderRequest) -> Vec<String> {
        let mut args = vec![
            "--output".to_owned(),
            request.output.to_string_lossy().into_owned(),
        ];
        if !request.external {
            args.push("--background".to_owned());
        }
        args.extend([
            "--width".to_owned(),
            request.width.to_string(),
            "--height".to_owned(),
            request.height.to_string(),
            request.scene_path.to_string_lossy().into_owned(),
        ]);
        args
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::FRAC_PI_2;

    use super::*;
    use crate::core::placement::{Placement, Rotation};

    /// every value of attribute `name` in document order
    fn attr<'a>(text: &'a str, name: &str) -> Vec<&'a str> {
        let pattern = format!(" {}=\"", name);
        text.match_indices(&pattern)
            .map(|(i, _)| {
                let rest = &text[i + pattern.len()..];
                &rest[..rest.find('"').unwrap()]
            })
            .collect()
    }

    fn floats(value: &str) -> Vec<f64> {
        value
            .split_whitespace()
            .map(|v| v.parse().unwrap())
            .collect()
    }

    fn assert_close(value: &str, expected: [f64; 3]) {
        let got = floats(value);
        assert_eq!(got.len(), 3);
        for (g, e) in got.iter().zip(expected.iter()) {
            assert!((g - e).abs() < 1e-12, "{} != {:?}", value, expected);
        }
    }

    fn triangle() -> Mesh {
        Mesh::new(vec![DVec3::ZERO, DVec3::X, DVec3::Y], vec![[0, 1, 2]])
    }

    #[test]
    fn opaque_object_has_no_mix_term() {
        let text = CyclesRenderer.write_object("cube", &triangle(), Color::WHITE, 1.0);
        assert!(!text.contains("transparent_bsdf"));
        assert!(!text.contains("mix_closure"));
        assert!(text.contains(r#"<connect from="cube_bsdf bsdf"   to="output surface"/>"#));
    }

    #[test]
    fn translucent_object_mixes_both_terms() {
        let text = CyclesRenderer.write_object("cube", &triangle(), Color::WHITE, 0.5);
        assert_eq!(text.matches("<mix_closure").count(), 1);
        assert_eq!(attr(&text, "fac"), vec!["0.5"]);
        assert!(text.contains(r#"<connect from="cube_trans bsdf"  to="cube_mix closure1"/>"#));
        assert!(text.contains(r#"<connect from="cube_bsdf bsdf"   to="cube_mix closure2"/>"#));
        assert!(text.contains(r#"<connect from="cube_mix closure" to="output surface"/>"#));
    }

    #[test]
    fn single_triangle_mesh_block() {
        let color = Color::new(0.8, 0.25, 0.0);
        let text = CyclesRenderer.write_object("tri", &triangle(), color, 1.0);
        assert_eq!(attr(&text, "P"), vec!["0 0 0  1 0 0  0 1 0"]);
        assert_eq!(attr(&text, "nverts"), vec!["3"]);
        assert_eq!(attr(&text, "verts"), vec!["0 1 2"]);
        assert_eq!(attr(&text, "color"), vec!["0.8, 0.25, 0"]);
        assert!(text.contains(r#"<state shader="tri_mat">"#));
    }

    #[test]
    fn faces_are_joined_with_two_spaces() {
        let mesh = Mesh::new(
            vec![DVec3::ZERO, DVec3::X, DVec3::Y, DVec3::ONE],
            vec![[0, 1, 2], [1, 3, 2]],
        );
        let text = CyclesRenderer.write_object("quad", &mesh, Color::WHITE, 1.0);
        assert_eq!(attr(&text, "nverts"), vec!["3  3"]);
        assert_eq!(attr(&text, "verts"), vec!["0 1 2  1 3 2"]);
    }

    #[test]
    fn point_light_strength_is_scaled() {
        for &power in &[0.0, 1.0, 2.5, 0.3, 1234.5] {
            let light = PointLight::new("lamp".to_owned(), DVec3::ONE, Color::WHITE, power);
            let text = CyclesRenderer.write_pointlight(&light);
            let strengths = attr(&text, "strength");
            assert_eq!(strengths.len(), 2);
            assert_eq!(strengths[0].parse::<f64>().unwrap(), power * 100.0);
            assert_eq!(strengths[1], "1 1 1");
        }
        let light = PointLight::new("lamp".to_owned(), DVec3::ONE, Color::WHITE, 2.5);
        let text = CyclesRenderer.write_pointlight(&light);
        assert_eq!(attr(&text, "strength")[0], "250");
        assert_eq!(attr(&text, "co"), vec!["1 1 1"]);
        assert!(text.contains(r#"<light type="point""#));
    }

    #[test]
    fn area_light_direction_is_cross_of_axes() {
        let rotation = Rotation::new(DVec3::X, FRAC_PI_2);
        let light = AreaLight::new(
            "panel".to_owned(),
            Placement::new(DVec3::new(0.0, 0.0, 3.0), rotation),
            2.0,
            0.5,
            Color::WHITE,
            4.0,
        );
        let text = CyclesRenderer.write_arealight(&light);
        assert_close(attr(&text, "axisu")[0], [1.0, 0.0, 0.0]);
        assert_close(attr(&text, "axisv")[0], [0.0, 0.0, 1.0]);
        assert_close(attr(&text, "dir")[0], [0.0, -1.0, 0.0]);
        assert_eq!(attr(&text, "strength")[0], "400");
        assert_eq!(attr(&text, "sizeu"), vec!["2"]);
        assert_eq!(attr(&text, "sizev"), vec!["0.5"]);
        assert_eq!(attr(&text, "co"), vec!["0 0 3"]);
    }

    #[test]
    fn camera_angle_is_in_degrees() {
        let camera = CameraSpec {
            name: "cam".to_owned(),
            position: DVec3::new(1.0, 2.0, 3.0),
            rotation: Rotation::new(DVec3::Z, FRAC_PI_2),
            up: DVec3::Y,
            target: DVec3::ZERO,
        };
        let text = CyclesRenderer.write_camera(&camera);
        let rotate = floats(attr(&text, "rotate")[0]);
        assert!((rotate[0] - 90.0).abs() < 1e-9);
        assert_eq!(&rotate[1..], &[0.0, 0.0, 1.0]);
        assert_eq!(attr(&text, "translate"), vec!["1 2 3"]);
        assert_eq!(attr(&text, "scale"), vec!["1 1 -1"]);
        assert!(text.contains(r#"<camera type="perspective"/>"#));
    }
}
