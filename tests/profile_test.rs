use naming_convention::{AssetFilter, ImportProfile, StringFilter, StringMatchType, Template};

#[cfg(test)]
mod tests {
    use super::*;

    // Helper creating the profile claiming everything below Assets/Test/<folder>/
    fn create_profile() -> ImportProfile {
        ImportProfile::new(
            "Test Profile",
            Template::new("Test Pattern", "Assets/Test/{varName}/").unwrap(),
        )
    }

    // Helper creating a filter for PNG files named <something>_001
    fn create_filter() -> AssetFilter {
        let mut filter = AssetFilter::new(Template::new("Test Pattern", "{varFile}_001").unwrap());
        filter.extensions = vec![".png".to_string()];
        filter
    }

    #[test]
    fn test_valid_asset_path() {
        let profile = create_profile();
        let filter = create_filter();

        assert!(profile.is_match("Assets/Test/SomeAsset/SomeAsset_001.png"));
        assert!(filter.is_match(&profile, "Assets/Test/SomeAsset/SomeAsset_001.png"));
    }

    #[test]
    fn test_wrong_path() {
        let profile = create_profile();
        let filter = create_filter();

        assert!(!profile.is_match("Assets/Other/SomeAsset/SomeAsset_001.png"));
        assert!(!filter.is_match(&profile, "Assets/Other/SomeAsset/SomeAsset_001.png"));
    }

    #[test]
    fn test_wrong_extension() {
        let profile = create_profile();
        let filter = create_filter();

        assert!(!filter.is_match(&profile, "Assets/Test/SomeAsset/SomeAsset_001.tga"));
    }

    #[test]
    fn test_any_extension_when_none_listed() {
        let profile = create_profile();
        let mut filter = create_filter();
        filter.extensions.clear();

        assert!(filter.is_match(&profile, "Assets/Test/SomeAsset/SomeAsset_001.tga"));
    }

    #[test]
    fn test_file_must_match_fully() {
        let profile = create_profile();
        let filter = create_filter();

        assert!(!filter.is_match(&profile, "Assets/Test/SomeAsset/SomeAsset_001_extra.png"));
        assert!(!filter.is_match(&profile, "Assets/Test/SomeAsset/SomeAsset_002.png"));
    }

    #[test]
    fn test_disabled_profile() {
        let mut profile = create_profile();
        profile.enabled = false;
        let filter = create_filter();

        assert!(!profile.is_match("Assets/Test/SomeAsset/SomeAsset_001.png"));
        assert!(!filter.is_match(&profile, "Assets/Test/SomeAsset/SomeAsset_001.png"));
    }

    #[test]
    fn test_disabled_filter() {
        let profile = create_profile();
        let mut filter = create_filter();
        filter.enabled = false;

        assert!(!filter.is_match(&profile, "Assets/Test/SomeAsset/SomeAsset_001.png"));
    }

    #[test]
    fn test_path_exclusion() {
        let mut profile = create_profile();
        profile.path_exclusions =
            vec![StringFilter::new(StringMatchType::Contains, "/vfx/", true).unwrap()];
        let filter = create_filter();

        assert!(!profile.is_match("Assets/Test/SomeAsset/VFX/SomeAsset_001.png"));
        assert!(filter.is_match(&profile, "Assets/Test/SomeAsset/SomeAsset_001.png"));
    }

    #[test]
    fn test_file_exclusion() {
        let profile = create_profile();
        let mut filter = create_filter();
        filter.file_exclusions =
            vec![StringFilter::new(StringMatchType::StartsWith, "Other", false).unwrap()];

        assert!(!filter.is_match(&profile, "Assets/Test/SomeAsset/OtherAsset_001.png"));
        assert!(filter.is_match(&profile, "Assets/Test/SomeAsset/SomeAsset_001.png"));
    }

    #[test]
    fn test_sub_paths() {
        let profile = create_profile();
        let mut filter = create_filter();
        filter.sub_paths = vec!["Textures".to_string(), "Maps/".to_string()];

        assert!(filter.is_match(&profile, "Assets/Test/SomeAsset/Textures/SomeAsset_001.png"));
        assert!(filter.is_match(&profile, "Assets/Test/SomeAsset/Maps/Detail/SomeAsset_001.png"));
        assert!(!filter.is_match(&profile, "Assets/Test/SomeAsset/SomeAsset_001.png"));
        assert!(!filter.is_match(&profile, "Assets/Test/SomeAsset/Models/SomeAsset_001.png"));
    }

    #[test]
    fn test_matching_filter_picks_first_accepting_filter() {
        let mut profile = create_profile();
        let mut textures = create_filter();
        textures.sub_paths = vec!["Textures".to_string()];
        let fallback = AssetFilter::new(Template::new("Any", "{name}").unwrap());
        profile.filters = vec![textures, fallback];

        let found = profile
            .matching_filter("Assets/Test/SomeAsset/Textures/SomeAsset_001.png")
            .unwrap();
        assert_eq!(found.sub_paths, vec!["Textures"]);

        let found = profile
            .matching_filter("Assets/Test/SomeAsset/readme.txt")
            .unwrap();
        assert!(found.sub_paths.is_empty());
    }

    #[test]
    fn test_matching_keeps_input_order() {
        let profile = create_profile();
        let paths: Vec<String> = (0..200)
            .map(|i| {
                if i % 3 == 0 {
                    format!("Assets/Other/Asset{i}/Asset{i}_001.png")
                } else {
                    format!("Assets/Test/Asset{i}/Asset{i}_001.png")
                }
            })
            .collect();

        let matched = profile.matching(&paths);
        let expected: Vec<&str> = paths
            .iter()
            .map(String::as_str)
            .filter(|path| path.starts_with("Assets/Test/"))
            .collect();
        assert_eq!(matched, expected);
    }
}
