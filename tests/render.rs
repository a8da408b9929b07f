use scene_tracer::camera::Camera;
use scene_tracer::color::Color;
use scene_tracer::scene::Scene;

/// A white sphere straight ahead of a camera sitting on the viewport,
/// lit only by white ambient light.
const AMBIENT_SPHERE: &str = "\
ENV 0 1 1
AMB 1 1 1
DL 0 0 -1 0 0 0
SPHERE 0 0 5 1 1 1 1 0 0 0
";

fn ppm(scene: &Scene) -> String {
    let canvas = scene.camera.render(&scene.world);
    let mut out = Vec::new();
    canvas.write_ppm(&mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn single_pixel_sphere_is_white() {
    let scene = Scene::from_text(AMBIENT_SPHERE).unwrap();

    assert_eq!(ppm(&scene), "P3\n1 1\n255\n255 255 255\n");
}

#[test]
fn empty_scene_is_all_background() {
    let text = "ENV -3 4 2\nBG 0.5 0 1\nDL 0 0 -1 1 1 1\n";
    let scene = Scene::from_text(text).unwrap();
    let image = ppm(&scene);

    let mut lines = image.lines();
    assert_eq!(lines.next(), Some("P3"));
    assert_eq!(lines.next(), Some("4 2"));
    assert_eq!(lines.next(), Some("255"));
    assert_eq!(lines.clone().count(), 8);
    assert!(lines.all(|l| l == "127 0 255"));
}

#[test]
fn rectangle_fills_center_of_image() {
    // A wall covering the middle of a 3x3 image, nothing around it.
    let text = "\
ENV -1 3 3
BG 0 0 1
AMB 1 1 1
DL 0 0 -1 0 0 0
RECTANGLE -0.4 0.4 1 0.8 0.8 1 0 0 0 0 0
";
    let scene = Scene::from_text(text).unwrap();
    let canvas = scene.camera.render(&scene.world);

    assert_eq!(canvas.read_pixel(1, 1).unwrap(), Color::red());
    assert_eq!(canvas.read_pixel(0, 0).unwrap(), Color::blue());
    assert_eq!(canvas.read_pixel(2, 1).unwrap(), Color::blue());
}

#[test]
fn shadowed_wall_shows_only_ambient() {
    // The light comes in from the right, and a small sphere off to that side
    // sits between it and the middle of the wall.
    let text = "\
ENV -1 3 3
AMB 0.25 0.25 0.25
DL 1 0 -1 1 1 1
RECTANGLE -20 20 10 40 40 1 1 1 0 0 0
SPHERE 2.5 0 7.5 0.5 1 1 1 0 0 0
";
    let scene = Scene::from_text(text).unwrap();
    let canvas = scene.camera.render(&scene.world);

    // The camera sees the wall, not the sphere, through the center pixel.
    let center = scene.camera.ray_for_pixel(2, 2);
    assert!(scene.world.trace(&center).map_or(false, |h| h.t > 10.0));
    assert_eq!(canvas.read_pixel(1, 1).unwrap(), Color::rgb(0.25, 0.25, 0.25));

    let lit = 0.25 + 0.5f64.sqrt();
    assert_eq!(canvas.read_pixel(0, 0).unwrap(), Color::rgb(lit, lit, lit));
}

#[test]
fn json_and_text_render_alike() {
    let json = r#"{
        "camera": { "z": 0, "width": 1, "height": 1 },
        "ambient": [1, 1, 1],
        "light": { "direction": [0, 0, -1], "color": [0, 0, 0] },
        "primitives": [
            { "kind": "sphere", "center": [0, 0, 5], "radius": 1,
              "surface": { "constant": [1, 1, 1] } }
        ]
    }"#;

    let from_json = Scene::from_json(json).unwrap();
    let from_text = Scene::from_text(AMBIENT_SPHERE).unwrap();

    assert_eq!(ppm(&from_json), ppm(&from_text));
}

#[test]
fn parallel_render_of_demo_matches_serial() {
    let mut scene = Scene::demo().unwrap();
    scene.camera = Camera::new(scene.camera.camera_z(), 40, 12).unwrap();

    let serial = scene.camera.render(&scene.world);
    let parallel = scene.camera.render_parallel(&scene.world, 3).unwrap();

    assert_eq!(serial, parallel);
}
