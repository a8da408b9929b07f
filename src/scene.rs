use std::convert::TryFrom;
use std::io::Read;

use log::warn;
use serde::{ Serialize, Deserialize };

use crate::camera::Camera;
use crate::color::Color;
use crate::error::{ SceneError, SceneResult };
use crate::geometry::{ Primitive, Rectangle, Sphere };
use crate::light::DirectionalLight;
use crate::surface::Surface;
use crate::world::World;

/// Everything needed to render an image: what to look at, and from where.
#[derive(Clone, Debug)]
pub struct Scene {
    pub world: World,
    pub camera: Camera,
}

impl TryFrom<SceneJson> for Scene {
    type Error = SceneError;

    fn try_from(scene_json: SceneJson) -> Result<Scene, SceneError> {
        // Create the camera.
        let camera_json = scene_json.camera.ok_or(SceneError::MissingCamera)?;
        let camera = Camera::new(
            camera_json.z,
            camera_json.width,
            camera_json.height
        )?;

        // Create the light, normalizing its direction.
        let light_json = scene_json.light.ok_or(SceneError::MissingLight)?;
        let light_source = DirectionalLight::new(
            light_json.direction.into(),
            light_json.color.into()
        )?;

        // Create the world.
        let mut world = World::new(
            scene_json.background.into_surface()?,
            scene_json.ambient.into(),
            light_source
        );
        world.objects = scene_json.primitives.into_iter()
            .map(Primitive::try_from)
            .collect::<Result<_, _>>()?;

        Ok(Scene { world, camera })
    }
}

impl Scene {
    /// Builds a scene from the line-oriented text description.
    pub fn from_text(text: &str) -> SceneResult<Scene> {
        Scene::try_from(SceneJson::parse_text(text)?)
    }

    /// Builds a scene from a JSON description.
    pub fn from_json(text: &str) -> SceneResult<Scene> {
        Scene::try_from(serde_json::from_str::<SceneJson>(text)?)
    }

    /// Reads a whole text description from a reader, e.g. standard input.
    pub fn read_text<R: Read>(mut input: R) -> SceneResult<Scene> {
        let mut text = String::new();
        input.read_to_string(&mut text)?;
        Scene::from_text(&text)
    }

    /// Reads a whole JSON description from a reader.
    pub fn read_json<R: Read>(input: R) -> SceneResult<Scene> {
        Scene::try_from(serde_json::from_reader::<_, SceneJson>(input)?)
    }

    /// The built-in demo scene. See `SceneJson::demo`.
    pub fn demo() -> SceneResult<Scene> {
        Scene::try_from(SceneJson::demo())
    }
}

/// A scene description, as read from JSON or from the text format.
///
/// Nothing here is validated; conversion into a `Scene` checks geometry,
/// resolves procedural surface names and insists on a camera and a light.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SceneJson {
    pub camera: Option<CameraJson>,

    #[serde(default)]
    pub background: SurfaceJson,

    #[serde(default)]
    pub ambient: [f64; 3],

    pub light: Option<LightJson>,

    #[serde(default)]
    pub primitives: Vec<PrimitiveJson>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraJson {
    pub z: f64,
    pub width: usize,
    pub height: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LightJson {
    pub direction: [f64; 3],
    pub color: [f64; 3],
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceJson {
    Constant([f64; 3]),
    Function(String),
}

impl Default for SurfaceJson {
    fn default() -> SurfaceJson {
        SurfaceJson::Constant([0.0, 0.0, 0.0])
    }
}

impl SurfaceJson {
    fn into_surface(self) -> Result<Surface, SceneError> {
        match self {
            SurfaceJson::Constant(c) => Ok(Color::from(c).into()),
            SurfaceJson::Function(name) => Surface::named(&name),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PrimitiveJson {
    Sphere {
        center: [f64; 3],
        radius: f64,
        surface: SurfaceJson,
        #[serde(default)]
        shine: [f64; 3],
    },
    Rectangle {
        upper_left: [f64; 3],
        width: f64,
        height: f64,
        surface: SurfaceJson,
        #[serde(default)]
        shine: [f64; 3],
    },
}

impl TryFrom<PrimitiveJson> for Primitive {
    type Error = SceneError;

    fn try_from(primitive_json: PrimitiveJson) -> Result<Primitive, SceneError> {
        let primitive = match primitive_json {
            PrimitiveJson::Sphere { center, radius, surface, shine } =>
                Sphere::new(center.into(), radius, surface.into_surface()?,
                    shine.into())?.into(),
            PrimitiveJson::Rectangle {
                upper_left, width, height, surface, shine
            } => Rectangle::new(upper_left.into(), width, height,
                    surface.into_surface()?, shine.into())?.into(),
        };

        Ok(primitive)
    }
}

/// The arguments of one line of a text description.
struct Line<'a> {
    number: usize,
    keyword: &'a str,
    args: Vec<&'a str>,
}

impl<'a> Line<'a> {
    fn malformed(&self, reason: String) -> SceneError {
        SceneError::Malformed { line: self.number, reason }
    }

    /// Checks that the line carries exactly `n` arguments.
    fn arity(&self, n: usize) -> Result<(), SceneError> {
        if self.args.len() != n {
            return Err(self.malformed(format!(
                "{} takes {} values, found {}",
                self.keyword, n, self.args.len()
            )));
        }

        Ok(())
    }

    fn number(&self, i: usize) -> Result<f64, SceneError> {
        let token = self.args[i];
        token.parse::<f64>().map_err(|_| {
            self.malformed(format!("\"{}\" is not a number", token))
        })
    }

    fn count(&self, i: usize) -> Result<usize, SceneError> {
        let token = self.args[i];
        token.parse::<usize>().map_err(|_| {
            self.malformed(format!("\"{}\" is not a pixel count", token))
        })
    }

    fn triple(&self, i: usize) -> Result<[f64; 3], SceneError> {
        Ok([self.number(i)?, self.number(i + 1)?, self.number(i + 2)?])
    }

    fn name(&self, i: usize) -> String {
        self.args[i].to_string()
    }
}

impl SceneJson {
    /// A built-in scene: two procedurally colored spheres against a sunset.
    pub fn demo() -> SceneJson {
        let shine = [0.8, 0.8, 0.8];

        SceneJson {
            camera: Some(CameraJson { z: -3.3, width: 800, height: 240 }),
            background: SurfaceJson::Function("sunset".to_string()),
            ambient: [0.2, 0.2, 0.2],
            light: Some(LightJson {
                direction: [-1.0, 1.0, -1.0],
                color: [1.0, 1.0, 1.0],
            }),
            primitives: vec![
                PrimitiveJson::Sphere {
                    center: [1.4, -0.15, 16.0],
                    radius: 1.1,
                    surface: SurfaceJson::Function("swirl".to_string()),
                    shine,
                },
                PrimitiveJson::Sphere {
                    center: [-0.6, 0.2, 13.0],
                    radius: 1.1,
                    surface: SurfaceJson::Function("ripple".to_string()),
                    shine,
                },
            ],
        }
    }

    /// Parses the line-oriented text description.
    ///
    /// Each line starts with a keyword followed by whitespace-separated
    /// values:
    ///
    /// ```text
    /// ENV camera_z width height
    /// BG r g b
    /// BGFN name
    /// AMB r g b
    /// DL dx dy dz r g b
    /// SPHERE cx cy cz radius r g b sr sg sb
    /// SPHEREFN cx cy cz radius name sr sg sb
    /// RECTANGLE ulx uly ulz w h r g b sr sg sb
    /// RECTANGLEFN ulx uly ulz w h name sr sg sb
    /// ```
    ///
    /// Blank lines and lines starting with `#` are ignored. Lines with an
    /// unknown keyword are skipped with a warning. Later `ENV`, `BG`, `AMB`
    /// and `DL` lines replace earlier ones. Primitives are listed last line
    /// first, so on an exact tie the later line wins.
    pub fn parse_text(text: &str) -> Result<SceneJson, SceneError> {
        let mut scene = SceneJson::default();

        for (i, raw) in text.lines().enumerate() {
            let trimmed = raw.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let mut tokens = trimmed.split_whitespace();
            let keyword = match tokens.next() {
                Some(k) => k,
                None => continue,
            };
            let line = Line { number: i + 1, keyword, args: tokens.collect() };

            match keyword {
                "ENV" => {
                    line.arity(3)?;
                    scene.camera = Some(CameraJson {
                        z: line.number(0)?,
                        width: line.count(1)?,
                        height: line.count(2)?,
                    });
                },
                "BG" => {
                    line.arity(3)?;
                    scene.background = SurfaceJson::Constant(line.triple(0)?);
                },
                "BGFN" => {
                    line.arity(1)?;
                    scene.background = SurfaceJson::Function(line.name(0));
                },
                "AMB" => {
                    line.arity(3)?;
                    scene.ambient = line.triple(0)?;
                },
                "DL" => {
                    line.arity(6)?;
                    scene.light = Some(LightJson {
                        direction: line.triple(0)?,
                        color: line.triple(3)?,
                    });
                },
                "SPHERE" => {
                    line.arity(10)?;
                    scene.primitives.push(PrimitiveJson::Sphere {
                        center: line.triple(0)?,
                        radius: line.number(3)?,
                        surface: SurfaceJson::Constant(line.triple(4)?),
                        shine: line.triple(7)?,
                    });
                },
                "SPHEREFN" => {
                    line.arity(8)?;
                    scene.primitives.push(PrimitiveJson::Sphere {
                        center: line.triple(0)?,
                        radius: line.number(3)?,
                        surface: SurfaceJson::Function(line.name(4)),
                        shine: line.triple(5)?,
                    });
                },
                "RECTANGLE" => {
                    line.arity(11)?;
                    scene.primitives.push(PrimitiveJson::Rectangle {
                        upper_left: line.triple(0)?,
                        width: line.number(3)?,
                        height: line.number(4)?,
                        surface: SurfaceJson::Constant(line.triple(5)?),
                        shine: line.triple(8)?,
                    });
                },
                "RECTANGLEFN" => {
                    line.arity(9)?;
                    scene.primitives.push(PrimitiveJson::Rectangle {
                        upper_left: line.triple(0)?,
                        width: line.number(3)?,
                        height: line.number(4)?,
                        surface: SurfaceJson::Function(line.name(5)),
                        shine: line.triple(6)?,
                    });
                },
                _ => warn!("skipping line {}: \"{}\"", line.number, trimmed),
            }
        }

        scene.primitives.reverse();
        Ok(scene)
    }
}

#[cfg(test)]
use crate::vector::Vector3;

#[cfg(test)]
const BASIC: &str = "\
ENV -3.3 60 40
BG 0.8 0.8 0.8
AMB 0.2 0.2 0.2
DL -1 1 -1 1 1 1
SPHERE 1 0 3 0.6 1 1 1 0 0 0
RECTANGLE 1 1.3 4 1 2.5 0 0 1 0 0 0
";

#[test]
fn parse_basic_text_scene() {
    let scene = Scene::from_text(BASIC).unwrap();

    assert_eq!(scene.camera, Camera::new(-3.3, 60, 40).unwrap());
    assert_eq!(scene.world.ambient, Color::rgb(0.2, 0.2, 0.2));
    assert_eq!(scene.world.objects.len(), 2);
    assert!(matches!(scene.world.objects[0], Primitive::Rectangle(_)));
    assert!(matches!(scene.world.objects[1], Primitive::Sphere(_)));

    let k = 1.0 / 3.0f64.sqrt();
    assert_eq!(scene.world.light_source.direction, Vector3::new(-k, k, -k));

    match &scene.world.background {
        Surface::Constant(c) => assert_eq!(*c, Color::rgb(0.8, 0.8, 0.8)),
        other => panic!("expected a constant background, got {:?}", other),
    }
}

#[test]
fn text_later_primitive_wins_coplanar_tie() {
    let text = "\
ENV -1 1 1
AMB 1 1 1
DL 0 0 -1 0 0 0
RECTANGLE -1 1 5 2 2 1 0 0 0 0 0
RECTANGLE -1 1 5 2 2 0 0 1 0 0 0
";
    let scene = Scene::from_text(text).unwrap();
    let canvas = scene.camera.render(&scene.world);

    assert_eq!(canvas.read_pixel(0, 0).unwrap(), Color::blue());
}

#[test]
fn text_comments_and_unknown_lines_are_skipped() {
    let text = format!("# a comment\n\nFOG 1 2 3\n{}", BASIC);
    let scene = Scene::from_text(&text).unwrap();

    assert_eq!(scene.world.objects.len(), 2);
}

#[test]
fn text_procedural_surfaces() {
    let text = "\
ENV -3.3 8 4
BGFN sunset
DL -1 1 -1 1 1 1
SPHEREFN -0.6 0.2 13 1.1 ripple 0.8 0.8 0.8
RECTANGLEFN 0 1 5 2 2 swirl 0 0 0
";
    let scene = Scene::from_text(text).unwrap();

    assert!(matches!(scene.world.background, Surface::Function(_)));
    assert!(matches!(scene.world.objects[0].surface(), Surface::Function(_)));
    assert!(matches!(scene.world.objects[1].surface(), Surface::Function(_)));
}

#[test]
fn text_unknown_surface_name() {
    let text = "ENV -3 4 4\nDL 0 0 -1 1 1 1\nBGFN plaid\n";

    assert!(matches!(Scene::from_text(text),
        Err(SceneError::UnknownSurface(_))));
}

#[test]
fn text_missing_camera_or_light() {
    let no_env = "DL 0 0 -1 1 1 1\nSPHERE 0 0 5 1 1 1 1 0 0 0\n";
    let no_light = "ENV -3 4 4\nSPHERE 0 0 5 1 1 1 1 0 0 0\n";

    assert!(matches!(Scene::from_text(no_env),
        Err(SceneError::MissingCamera)));
    assert!(matches!(Scene::from_text(no_light),
        Err(SceneError::MissingLight)));
}

#[test]
fn text_negative_geometry_is_fatal() {
    let sphere = "ENV -3 4 4\nDL 0 0 -1 1 1 1\nSPHERE 0 0 5 -1 1 1 1 0 0 0\n";
    let rect = "ENV -3 4 4\nDL 0 0 -1 1 1 1\nRECTANGLE 0 0 5 1 -2 1 1 1 0 0 0\n";

    assert!(matches!(Scene::from_text(sphere),
        Err(SceneError::NegativeRadius(_))));
    assert!(matches!(Scene::from_text(rect),
        Err(SceneError::NegativeHeight(_))));
}

#[test]
fn text_malformed_lines_name_the_line() {
    let short = "ENV -3 4 4\nDL 0 0 -1 1 1\n";
    let garbage = "ENV -3 4 4\nDL 0 0 -1 1 1 1\nAMB 0.2 zero 0.2\n";
    let fraction = "ENV -3 4.5 4\n";

    assert!(matches!(Scene::from_text(short),
        Err(SceneError::Malformed { line: 2, .. })));
    assert!(matches!(Scene::from_text(garbage),
        Err(SceneError::Malformed { line: 3, .. })));
    assert!(matches!(Scene::from_text(fraction),
        Err(SceneError::Malformed { line: 1, .. })));
}

#[test]
fn text_oversized_image() {
    let text = "ENV -1 4294967296 4294967296\nDL 0 0 -1 1 1 1\n";

    assert!(matches!(Scene::from_text(text),
        Err(SceneError::ImageTooLarge { .. })));
}

#[test]
fn text_zero_light_direction() {
    let text = "ENV -3 4 4\nDL 0 0 0 1 1 1\n";

    assert!(matches!(Scene::from_text(text),
        Err(SceneError::ZeroLightDirection)));
}

#[test]
fn parse_json_scene() {
    let json = r#"{
        "camera": { "z": -3.3, "width": 80, "height": 24 },
        "background": { "function": "sunset" },
        "ambient": [0.2, 0.2, 0.2],
        "light": { "direction": [-1, 1, -1], "color": [1, 1, 1] },
        "primitives": [
            { "kind": "sphere", "center": [0, 0, 5], "radius": 1,
              "surface": { "constant": [1, 0, 0] }, "shine": [0.5, 0.5, 0.5] },
            { "kind": "rectangle", "upper_left": [-1, 1, 8], "width": 2,
              "height": 2, "surface": { "function": "ripple" } }
        ]
    }"#;

    let scene = Scene::from_json(json).unwrap();
    assert_eq!(scene.camera, Camera::new(-3.3, 80, 24).unwrap());
    assert_eq!(scene.world.objects.len(), 2);
    assert_eq!(scene.world.objects[0].shine(), Color::rgb(0.5, 0.5, 0.5));
    assert_eq!(scene.world.objects[1].shine(), Color::black());
}

#[test]
fn json_unknown_primitive_kind() {
    let json = r#"{
        "camera": { "z": -3.3, "width": 8, "height": 8 },
        "light": { "direction": [0, 0, -1], "color": [1, 1, 1] },
        "primitives": [ { "kind": "torus", "center": [0, 0, 5] } ]
    }"#;

    assert!(matches!(Scene::from_json(json), Err(SceneError::Json(_))));
}

#[test]
fn text_and_json_describe_the_same_scene() {
    let from_text = SceneJson::parse_text(BASIC).unwrap();
    let round = serde_json::to_string(&from_text).unwrap();
    let from_json: SceneJson = serde_json::from_str(&round).unwrap();

    assert_eq!(from_json.camera, from_text.camera);
    assert_eq!(from_json.primitives, from_text.primitives);
}

#[test]
fn demo_scene_builds() {
    let scene = Scene::demo().unwrap();

    assert_eq!(scene.camera, Camera::new(-3.3, 800, 240).unwrap());
    assert_eq!(scene.world.objects.len(), 2);
}
