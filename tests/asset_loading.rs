//! Asset loading integration tests — config file, .anim file and textures on disk.

use std::path::Path;

use assert_approx_eq::assert_approx_eq;
use sprite_anim::anim::{AnimationLoader, LoadError, ParamValue};
use sprite_anim::config::{load_config_from, AnimConfig};
use sprite_anim::dsl::DuplicateKeyPolicy;

const HERO: &str = r#"
@ANIM_ROOT;
@FRAMES_PER_UPDATE 2;
@PARAM str action: {
    @VALUE walk: {
        @PARAM float speed: {
            @VALUE 1.5: {
                @USE_TEX "walk/0.png";
                @USE_TEX "walk/1.png";
            }
        }
    }
}
"#;

fn write_assets(dir: &Path) {
    std::fs::create_dir_all(dir.join("walk")).unwrap();
    std::fs::write(dir.join("walk/0.png"), b"frame0").unwrap();
    std::fs::write(dir.join("walk/1.png"), b"frame1").unwrap();
    std::fs::write(dir.join("hero.anim"), HERO).unwrap();
}

#[test]
fn load_and_play_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    write_assets(dir.path());

    let loader = AnimationLoader::default();
    let mut anim = loader.load(&dir.path().join("hero.anim")).unwrap();
    anim.set_string("action", "walk").unwrap();
    anim.set_float("speed", 1.5).unwrap();

    match anim.parameter("speed").unwrap().value {
        Some(ParamValue::Float(v)) => assert_approx_eq!(v, 1.5),
        ref other => panic!("expected float, got {other:?}"),
    }

    anim.tick().unwrap();
    anim.tick().unwrap();
    let frame = anim.current_frame().unwrap();
    assert!(loader.images().path(frame).unwrap().ends_with("walk/1.png"));
    assert_eq!(loader.images().len(), 2);
}

#[test]
fn two_assets_share_images() {
    let dir = tempfile::tempdir().unwrap();
    write_assets(dir.path());
    std::fs::write(dir.path().join("villain.anim"), HERO).unwrap();

    let loader = AnimationLoader::default();
    let mut hero = loader.load(&dir.path().join("hero.anim")).unwrap();
    let mut villain = loader.load(&dir.path().join("villain.anim")).unwrap();
    for anim in [&mut hero, &mut villain] {
        anim.set_string("action", "walk").unwrap();
        anim.set_string("speed", "1.5").unwrap();
    }
    assert_eq!(hero.current_frame().unwrap(), villain.current_frame().unwrap());
    assert_eq!(loader.images().len(), 2);
}

#[test]
fn config_file_drives_loading() {
    let dir = tempfile::tempdir().unwrap();
    let assets = dir.path().join("assets");
    write_assets(&assets);
    let scripts = dir.path().join("scripts");
    std::fs::create_dir(&scripts).unwrap();
    std::fs::write(scripts.join("hero.anim"), HERO).unwrap();

    let config_path = dir.path().join("config.yaml");
    std::fs::write(
        &config_path,
        format!(
            "asset_root: {}\nduplicate_keys: reject\npreload: true\n",
            assets.display()
        ),
    )
    .unwrap();

    let config = load_config_from(&config_path).unwrap();
    assert_eq!(config.duplicate_keys, DuplicateKeyPolicy::Reject);

    let loader = AnimationLoader::new(config);
    let anim = loader.load(&scripts.join("hero.anim")).unwrap();
    assert_eq!(anim.loaded_states(), 1);
    assert_eq!(loader.images().len(), 2);
}

#[test]
fn missing_texture_surfaces_on_first_use() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("hero.anim"), HERO).unwrap();

    let loader = AnimationLoader::new(AnimConfig::default());
    let mut anim = loader.load(&dir.path().join("hero.anim")).unwrap();
    anim.set_string("action", "walk").unwrap();
    assert!(anim.set_string("speed", "1.5").is_err());
    assert!(anim.active_key().is_none());
}

#[test]
fn malformed_script_reports_file_and_line() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.anim");
    std::fs::write(&path, "@ANIM_ROOT;\n@PARAM str s: {\n  @VALUE v: { @USE_TEX a.png: }\n}\n").unwrap();

    let err = AnimationLoader::default().load(&path).err().unwrap();
    assert!(matches!(err, LoadError::CompileFile { .. }));
    let msg = err.to_string();
    assert!(msg.contains("broken.anim"), "{msg}");
    assert!(msg.contains("[3:"), "{msg}");
}
