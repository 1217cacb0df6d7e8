use super::*;

#[test]
fn preset_table_matches_factory_sizes() {
    let presets = PlatformPresets::default();
    assert_eq!(presets.get(Platform::Instagram), Size { width: 1080, height: 1080 });
    assert_eq!(presets.get(Platform::Linkedin), Size { width: 1200, height: 627 });
    assert_eq!(presets.get(Platform::Tiktok), Size { width: 1080, height: 1920 });
    assert_eq!(presets.get(Platform::Youtube), Size { width: 1280, height: 720 });
}

#[test]
fn presets_are_mutable_and_resettable() {
    let mut presets = PlatformPresets::default();
    presets
        .set(Platform::Twitter, Size { width: 800, height: 400 })
        .unwrap();
    assert_eq!(presets.get(Platform::Twitter).width, 800);
    assert!(presets.set(Platform::Twitter, Size { width: 0, height: 1 }).is_err());
    presets.reset(Platform::Twitter);
    assert_eq!(presets.get(Platform::Twitter), Platform::Twitter.default_size());
}

#[test]
fn platform_names_roundtrip() {
    for p in Platform::ALL {
        assert_eq!(p.name().parse::<Platform>().unwrap(), p);
        assert_eq!(serde_json::to_string(&p).unwrap(), format!("\"{p}\""));
    }
    assert!("myspace".parse::<Platform>().is_err());
}

#[test]
fn orientation_shortcuts() {
    assert_eq!("4:5".parse::<Orientation>().unwrap().size(), Some(Size { width: 1080, height: 1350 }));
    assert_eq!("9:16".parse::<Orientation>().unwrap().size(), Some(Size { width: 1080, height: 1920 }));
    assert_eq!(Orientation::Custom.size(), None);
}
