use astrojournal::journal_config::{JournalConfig, OutputKind};
use astrojournal::pipeline;
use astrojournal::profiles::Profile;
use std::fs;
use std::path::Path;

const SESSION_2020: &str = "Date\t01/02/2020\nSeeing\t4/5\n\
Target\tCons\tType\tPower\tNotes\n\
M31\tAnd\tGalaxy\t50x\tFaint core visible\n\n";

const SESSIONS_2019: &str = "# Autumn sessions\n\
Date\t01/01/2019\nLocation\tBackyard\nSeeing\t3\n\
Target\tCons\tType\tPower\tNotes\n\
M42\tOri\tNebula\t40x\tTrapezium resolved\n\
NGC 2244\tMon\tOpen cluster\t40x\tLoose & bright\n\
Jupiter\t\tPlanet\t120x\tFour moons\n\
M45\tTau\n\n\
Date\t15/06/2019\nLocation\tBackyard\nSeeing\t5\n\
Target\tCons\tType\tPower\tNotes\n\
M13\tHer\tGlobular cluster\t100x\t50% resolved\n\n";

fn create_journal(files: &[(&str, &str)]) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let raw = dir.path().join("raw_reports");
    fs::create_dir(&raw).unwrap();
    for (name, content) in files {
        fs::write(raw.join(name), content).unwrap();
    }
    dir
}

fn no_compile() -> JournalConfig {
    let mut config = JournalConfig::default();
    config.compiler.enabled = false;
    config
}

fn read(root: &Path, relative: &str) -> String {
    fs::read_to_string(root.join(relative))
        .unwrap_or_else(|e| panic!("cannot read {relative}: {e}"))
}

#[test]
fn test_target_fragment_for_single_observation() {
    let dir = create_journal(&[("2020.tsv", SESSION_2020)]);
    let summary = pipeline::generate(dir.path(), &no_compile()).unwrap();
    assert!(summary.is_success());

    let fragment = read(dir.path(), "latex_reports_by_target/m31_and.tex");
    assert!(fragment.starts_with("\\subsection{"));
    assert!(fragment.contains("M31"));
    assert!(fragment.contains("Galaxy"));
    assert_eq!(fragment.matches("\\item ").count(), 1);
    assert!(fragment.contains("01/02/2020"));
    assert!(fragment.contains("Faint core visible"));
}

#[test]
fn test_by_target_output_is_stable_across_runs() {
    let dir = create_journal(&[("2019.tsv", SESSIONS_2019), ("2020.tsv", SESSION_2020)]);
    let config = no_compile();

    pipeline::generate(dir.path(), &config).unwrap();
    let first = read(dir.path(), "astrojournal_by_target.tex");
    let first_fragment = read(dir.path(), "latex_reports_by_target/m42_ori.tex");

    pipeline::generate(dir.path(), &config).unwrap();
    assert_eq!(first, read(dir.path(), "astrojournal_by_target.tex"));
    assert_eq!(
        first_fragment,
        read(dir.path(), "latex_reports_by_target/m42_ori.tex")
    );
}

#[test]
fn test_by_date_lists_newest_first() {
    let dir = create_journal(&[("2019.tsv", SESSIONS_2019), ("2020.tsv", SESSION_2020)]);
    pipeline::generate(dir.path(), &no_compile()).unwrap();

    let document = read(dir.path(), "astrojournal_by_date.tex");
    let position = |needle: &str| {
        document
            .find(needle)
            .unwrap_or_else(|| panic!("{needle} missing"))
    };
    assert!(position("obs20200201}") < position("obs20190615}"));
    assert!(position("obs20190615}") < position("obs20190101}"));
    assert!(position("\\subsection{2020}") < position("\\subsection{2019}"));
    assert!(document.contains("\\input{latex_reports_by_date/statistics}"));
}

#[test]
fn test_short_rows_are_left_out() {
    let dir = create_journal(&[("2019.tsv", SESSIONS_2019)]);
    let summary = pipeline::generate(dir.path(), &no_compile()).unwrap();

    assert!(summary.warnings >= 1);
    assert!(!dir.path().join("latex_reports_by_target/m45_tau.tex").exists());
    let report = read(dir.path(), "latex_reports_by_date/obs20190101.tex");
    assert!(report.contains("M42"));
    assert!(!report.contains("M45"));
}

#[test]
fn test_statistics_fragment() {
    let dir = create_journal(&[("2019.tsv", SESSIONS_2019)]);
    pipeline::generate(dir.path(), &no_compile()).unwrap();

    let stats = read(dir.path(), "latex_reports_by_date/statistics.tex");
    assert!(stats.contains("BACKYARD & 2 & 4.00 & - & - \\\\\n"));
    assert!(stats.contains("2019 & 2 \\\\\n"));
    assert!(stats.contains("NEBULA & 1 \\\\\n"));
}

#[test]
fn test_statistics_can_be_disabled() {
    let dir = create_journal(&[("2019.tsv", SESSIONS_2019)]);
    let mut config = no_compile();
    config.statistics = false;
    pipeline::generate(dir.path(), &config).unwrap();

    assert!(!dir.path().join("latex_reports_by_date/statistics.tex").exists());
    let by_target = read(dir.path(), "astrojournal_by_target.tex");
    assert!(!by_target.contains("Basic Statistics"));
}

#[test]
fn test_by_target_sections_follow_catalogue_families() {
    let dir = create_journal(&[("2019.tsv", SESSIONS_2019)]);
    pipeline::generate(dir.path(), &no_compile()).unwrap();

    let document = read(dir.path(), "astrojournal_by_target.tex");
    let position = |needle: &str| {
        document
            .find(needle)
            .unwrap_or_else(|| panic!("{needle} missing"))
    };
    assert!(position("\\section{Solar System}") < position("\\section{Messier Catalogue}"));
    assert!(position("\\section{Messier Catalogue}") < position("latex_reports_by_target/m13_her}"));
    assert!(position("latex_reports_by_target/m13_her}") < position("latex_reports_by_target/m42_ori}"));
    assert!(position("latex_reports_by_target/m42_ori}") < position("\\section{New General Catalogue (NGC)}"));
    assert!(position("\\section{New General Catalogue (NGC)}") < position("latex_reports_by_target/ngc2244_mon}"));
}

#[test]
fn test_by_constellation_skips_solar_system() {
    let dir = create_journal(&[("2019.tsv", SESSIONS_2019)]);
    pipeline::generate(dir.path(), &no_compile()).unwrap();

    let document = read(dir.path(), "astrojournal_by_constellation.tex");
    assert!(document.contains("\\section{Ori}"));
    assert!(!document.contains("Jupiter"));
    let orion = read(dir.path(), "latex_reports_by_constellation/const_ori.tex");
    assert!(orion.contains("M42 (Nebula)"));
}

#[test]
fn test_text_journal() {
    let dir = create_journal(&[("2019.tsv", SESSIONS_2019)]);
    pipeline::generate(dir.path(), &no_compile()).unwrap();

    let text = read(dir.path(), "astrojournal_by_date.txt");
    assert!(text.contains("Date: 15/06/2019\n"));
    assert!(text.contains("M13 Her Globular cluster 100x\n50% resolved\n"));
    assert!(text.contains("NGC 2244 Mon Open cluster 40x\nLoose  and  bright\n"));
    assert!(text.find("15/06/2019").unwrap() < text.find("01/01/2019").unwrap());
    assert!(!text.contains("\\"));
}

#[test]
fn test_configured_outputs_only() {
    let dir = create_journal(&[("2020.tsv", SESSION_2020)]);
    fs::write(
        dir.path().join("journal.toml"),
        "outputs = [\"text-by-date\"]\n\n[text_by_date]\ndocument = \"forum.txt\"\n\n[compiler]\nenabled = false\n",
    )
    .unwrap();

    let config = JournalConfig::load_from_dir(dir.path()).unwrap();
    assert_eq!(config.outputs, vec![OutputKind::TextByDate]);

    let summary = pipeline::generate(dir.path(), &config).unwrap();
    assert_eq!(summary.passes.len(), 1);
    assert!(dir.path().join("forum.txt").is_file());
    assert!(!dir.path().join("astrojournal_by_date.tex").exists());
}

#[test]
fn test_minimal_profile_reports() {
    let dir = create_journal(&[(
        "mini.tsv",
        "Date\t03/03/2021\nTarget\tCons\tType\nMars\t\tPlanet\nM81\tUMa\tGalaxy\n",
    )]);
    let mut config = no_compile();
    config.profile = Profile::Minimal;

    let summary = pipeline::generate(dir.path(), &config).unwrap();
    assert!(summary.is_success());
    assert_eq!(summary.warnings, 0);
    assert!(dir.path().join("latex_reports_by_target/mars.tex").is_file());
    assert!(dir.path().join("latex_reports_by_target/m81_uma.tex").is_file());
}

#[test]
fn test_generate_without_raw_folder() {
    let dir = tempfile::tempdir().unwrap();
    assert!(pipeline::generate(dir.path(), &no_compile()).is_err());
}
