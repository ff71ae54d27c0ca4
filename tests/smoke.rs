use assert_cmd::Command;

#[test]
fn cli_help_runs() {
    let mut cmd = Command::cargo_bin("refscope").expect("binary exists");
    cmd.arg("--help").assert().success();
}

#[test]
fn build_writes_dataset_and_vocabulary() {
    let dir = tempfile::tempdir().expect("temp dir");
    let data_dir = dir.path().join("data");
    let outputs_dir = dir.path().join("outputs");
    std::fs::create_dir_all(&data_dir).expect("data dir");

    std::fs::write(
        data_dir.join("reports.csv"),
        "paper,refnum,recommendation,decision,female,cleaned_text\n\
         p1,r1,accept,accept,0,strong results\n\
         p1,r2,reject,accept,1,weak results\n",
    )
    .expect("write reports");
    std::fs::write(
        data_dir.join("papers.csv"),
        "paper,cleaned_text\np1,we study results\n",
    )
    .expect("write papers");

    let mut cmd = Command::cargo_bin("refscope").expect("binary exists");
    cmd.env("DATA_DIR", &data_dir)
        .env("OUTPUTS_DIR", &outputs_dir)
        .arg("build")
        .assert()
        .success();

    assert!(outputs_dir.join("dataset.csv").exists());
    let vocabulary =
        std::fs::read_to_string(outputs_dir.join("vocabulary.txt")).expect("vocabulary written");
    assert!(vocabulary.lines().any(|line| line == "results"));
}
