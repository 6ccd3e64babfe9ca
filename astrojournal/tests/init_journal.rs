use astrojournal::journal_config::JournalConfig;
use astrojournal::pipeline;
use astrojournal::profiles::{get_all_profiles, Profile};
use astrojournal::templates;

#[test]
fn test_init_then_generate() {
    for profile in get_all_profiles() {
        let dir = tempfile::tempdir().unwrap();
        let config = JournalConfig {
            profile,
            ..JournalConfig::default()
        };
        let written = templates::write_journal_skeleton(dir.path(), &config).unwrap();
        assert_eq!(written.len(), 8);

        let mut loaded = JournalConfig::load_from_dir(dir.path()).unwrap();
        assert_eq!(loaded.profile, profile);
        loaded.compiler.enabled = false;

        let summary = pipeline::generate(dir.path(), &loaded).unwrap();
        assert!(summary.is_success(), "{profile}");
        assert_eq!(summary.reports, 2, "{profile}");
        assert_eq!(summary.warnings, 0, "{profile}");
    }
}

#[test]
fn test_init_keeps_custom_templates_in_use() {
    let dir = tempfile::tempdir().unwrap();
    let config = JournalConfig {
        profile: Profile::Basic,
        ..JournalConfig::default()
    };
    templates::write_journal_skeleton(dir.path(), &config).unwrap();

    let header = config.header_footer_path(dir.path()).join("header_by_date.tex");
    std::fs::write(&header, "% my header\n\\begin{document}\n").unwrap();

    let mut config = JournalConfig::load_from_dir(dir.path()).unwrap();
    config.compiler.enabled = false;
    pipeline::generate(dir.path(), &config).unwrap();

    let document = std::fs::read_to_string(dir.path().join("astrojournal_by_date.tex")).unwrap();
    assert!(document.starts_with("% my header\n\\begin{document}\n"));
}
