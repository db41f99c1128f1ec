use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Ordered texture sources per body, keyed by lowercase body name.
/// Loaded from JSON at runtime or taken from [`TextureManifest::builtin`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextureManifest {
    /// Body name → candidate URLs, tried in order.
    #[serde(default)]
    pub sources: HashMap<String, Vec<String>>,
}

const SVS: &str = "https://svs.gsfc.nasa.gov/vis/a000000/a004800/a004887/frames/730x730_1x1_30p";
const SSS: &str = "https://www.solarsystemscope.com/textures/download";
const WIKI: &str = "https://upload.wikimedia.org/wikipedia/commons/thumb";

impl TextureManifest {
    /// Parse a manifest from a JSON string. Keys are normalised to lowercase.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let parsed: TextureManifest = serde_json::from_str(json)?;
        Ok(parsed.normalized())
    }

    /// Bundled asset first, then mirrors, for every body in the built-in catalog.
    pub fn builtin() -> Self {
        let mut sources = HashMap::new();
        let mut add = |name: &str, urls: Vec<String>| {
            sources.insert(name.to_string(), urls);
        };

        // Bundled file, NASA SVS still, Solar System Scope map.
        for (name, sss_file) in [
            ("sun", "2k_sun.jpg"),
            ("mercury", "2k_mercury.jpg"),
            ("venus", "2k_venus_atmosphere.jpg"),
            ("earth", "2k_earth_daymap.jpg"),
            ("mars", "2k_mars.jpg"),
            ("jupiter", "2k_jupiter.jpg"),
            ("saturn", "2k_saturn.jpg"),
            ("uranus", "2k_uranus.jpg"),
            ("neptune", "2k_neptune.jpg"),
            ("moon", "2k_moon.jpg"),
        ] {
            add(
                name,
                vec![
                    format!("textures/{}.jpg", name),
                    format!("{}/{}.jpg", SVS, name),
                    format!("{}/{}", SSS, sss_file),
                ],
            );
        }

        add(
            "pluto",
            vec![
                format!("{}/2k_pluto.jpg", SSS),
                format!("{}/e/ef/Pluto_in_True_Color_-_High-Res.jpg/600px-Pluto_in_True_Color_-_High-Res.jpg", WIKI),
            ],
        );

        // Solar System Scope map, then a Wikimedia still.
        for (name, wiki_path) in [
            ("io", "7/7b/Io_highest_resolution_true_color.jpg/600px-Io_highest_resolution_true_color.jpg"),
            ("europa", "5/54/Europa-moon.jpg/600px-Europa-moon.jpg"),
            ("ganymede", "f/f2/Ganymede_g1_true-edit1.jpg/600px-Ganymede_g1_true-edit1.jpg"),
            ("callisto", "e/e9/Callisto.jpg/600px-Callisto.jpg"),
        ] {
            add(name, vec![format!("{}/2k_{}.jpg", SSS, name), format!("{}/{}", WIKI, wiki_path)]);
        }
        add("titan", vec![format!("{}/2k_titan.jpg", SSS)]);

        // Wikimedia only.
        for (name, wiki_path) in [
            ("phobos", "5/5c/Phobos_colour_2008.jpg/600px-Phobos_colour_2008.jpg"),
            ("deimos", "8/8d/Deimos-MRO.jpg/600px-Deimos-MRO.jpg"),
            ("enceladus", "8/83/PIA17202_-_Approaching_Enceladus.jpg/800px-PIA17202_-_Approaching_Enceladus.jpg"),
            ("mimas", "b/bc/Mimas_Cassini.jpg/800px-Mimas_Cassini.jpg"),
            ("iapetus", "c/c9/Iapetus_706_1419_1.jpg/800px-Iapetus_706_1419_1.jpg"),
            ("rhea", "a/ab/PIA07763_Rhea_full_globe5.jpg/800px-PIA07763_Rhea_full_globe5.jpg"),
            ("titania", "8/84/Titania_%28moon%29_color%2C_edited.jpg/800px-Titania_%28moon%29_color%2C_edited.jpg"),
            ("oberon", "0/09/Voyager_2_picture_of_Oberon.jpg/800px-Voyager_2_picture_of_Oberon.jpg"),
            ("ariel", "5/59/Ariel_%28moon%29.jpg/800px-Ariel_%28moon%29.jpg"),
            ("umbriel", "2/2f/Umbriel_%28moon%29.jpg/800px-Umbriel_%28moon%29.jpg"),
            ("miranda", "5/59/Miranda.jpg/800px-Miranda.jpg"),
            ("triton", "a/a6/Triton_moon_mosaic_Voyager_2_%28large%29.jpg/800px-Triton_moon_mosaic_Voyager_2_%28large%29.jpg"),
            ("proteus", "3/33/Proteus_%28Voyager_2%29.jpg/800px-Proteus_%28Voyager_2%29.jpg"),
            ("nereid", "8/87/PIA02706_-_Neptune%27s_moon_Nereid_%28cropped%29.jpg/800px-PIA02706_-_Neptune%27s_moon_Nereid_%28cropped%29.jpg"),
        ] {
            add(name, vec![format!("{}/{}", WIKI, wiki_path)]);
        }

        Self { sources }
    }

    /// Candidate URLs for `body`; empty when the body has no entry.
    pub fn candidates(&self, body: &str) -> &[String] {
        self.sources
            .get(&body.trim().to_lowercase())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Replace entries with those from `other`.
    pub fn merge(&mut self, other: TextureManifest) {
        for (name, urls) in other.normalized().sources {
            self.sources.insert(name, urls);
        }
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    fn normalized(self) -> Self {
        let sources = self
            .sources
            .into_iter()
            .map(|(k, v)| (k.trim().to_lowercase(), v))
            .collect();
        Self { sources }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::registry::BodyRegistry;

    #[test]
    fn builtin_covers_every_catalog_body() {
        let manifest = TextureManifest::builtin();
        let reg = BodyRegistry::solar_system().unwrap();
        assert_eq!(manifest.len(), reg.len());
        for body in reg.iter() {
            assert!(!manifest.candidates(&body.name).is_empty(), "{} has no sources", body.name);
        }
    }

    #[test]
    fn bundled_asset_comes_first() {
        let manifest = TextureManifest::builtin();
        let earth = manifest.candidates("Earth");
        assert_eq!(earth.len(), 3);
        assert_eq!(earth[0], "textures/earth.jpg");
        assert!(earth[2].ends_with("2k_earth_daymap.jpg"));
        assert_eq!(manifest.candidates("Titan").len(), 1);
    }

    #[test]
    fn parse_and_merge() {
        let json = r#"{ "sources": { "Earth": ["local/earth.png"], "vulcan": [] } }"#;
        let parsed = TextureManifest::from_json(json).unwrap();
        assert_eq!(parsed.candidates("earth"), &["local/earth.png".to_string()]);

        let mut manifest = TextureManifest::builtin();
        manifest.merge(parsed);
        assert_eq!(manifest.candidates("EARTH").len(), 1);
        assert!(manifest.candidates("vulcan").is_empty());
        assert_eq!(manifest.candidates("Mars").len(), 3);
    }

    #[test]
    fn parse_minimal_manifest() {
        let manifest = TextureManifest::from_json("{}").unwrap();
        assert!(manifest.is_empty());
        assert!(manifest.candidates("Earth").is_empty());
    }
}
