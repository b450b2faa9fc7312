use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

fn bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_xyplot"))
}

fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("xyplot_{name}_{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn dump_has_one_header_and_filtered_rows() {
    let dir = scratch("dump");
    let input = dir.join("in.tsv");
    fs::write(&input, "1\t10\n2\t20\n3\t30\n").unwrap();
    let dump = dir.join("out.tsv");

    let status = bin()
        .args(["-o", "unused.png", "+xr", "2,", "+dump"])
        .arg(&dump)
        .arg("--no-draw")
        .arg(&input)
        .status()
        .expect("run xyplot");
    assert!(status.success());

    let s = fs::read_to_string(&dump).unwrap();
    let mut lines = s.lines();
    assert_eq!(lines.next(), Some("set\tx\ty\textra"));
    let rows: Vec<Vec<&str>> = lines.map(|l| l.split('\t').collect()).collect();
    assert_eq!(rows.len(), 2);
    let xs: Vec<f64> = rows.iter().map(|r| r[1].parse().unwrap()).collect();
    assert_eq!(xs, vec![2.0, 3.0]);
    assert!(rows.iter().all(|r| r[0] == "0"));

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn stats_report_every_input() {
    let dir = scratch("stats");
    let a = dir.join("a.tsv");
    let b = dir.join("b.tsv");
    fs::write(&a, "1\t1\n2\t4\n").unwrap();
    fs::write(&b, "1\t2\n2\t2\n3\t8\n").unwrap();

    let out = bin()
        .args(["-o", "unused.png", "--stats", "--no-draw", "+norm", "max=1"])
        .arg(&a)
        .arg(&b)
        .output()
        .expect("run xyplot");
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let stdout = String::from_utf8(out.stdout).unwrap();
    let stats: Vec<serde_json::Value> =
        stdout.lines().map(|l| serde_json::from_str(l).unwrap()).collect();
    assert_eq!(stats.len(), 2);
    assert_eq!(stats[0]["plot_type"], "xy");
    assert_eq!(stats[0]["points"], 2);
    assert_eq!(stats[1]["points"], 3);
    assert_eq!(stats[1]["y_range"][1], 1.0);

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn reads_stdin_when_no_files_are_given() {
    let mut child = bin()
        .args(["-o", "unused.png", "+type", "y", "--stats", "--no-draw"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("run xyplot");
    child.stdin.take().unwrap().write_all(b"5\n6\n7\n").unwrap();
    let out = child.wait_with_output().unwrap();
    assert!(out.status.success());
    let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(v["source"], "-");
    assert_eq!(v["points"], 3);
    assert_eq!(v["x_range"][0], 0.0);
}

#[test]
fn density_output_sits_on_a_fixed_grid() {
    let dir = scratch("density");
    let input = dir.join("x.txt");
    fs::write(&input, "1\n2\n2.5\n3\n7\n").unwrap();
    let out = bin()
        .args(["-o", "unused.png", "+type", "density", "+xr", "0,10", "--stats", "--no-draw"])
        .arg(&input)
        .output()
        .expect("run xyplot");
    assert!(out.status.success());
    let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(v["points"], 50);
    assert_eq!(v["x_range"][0], 0.0);
    assert_eq!(v["x_range"][1], 10.0);

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn bad_rows_fail_with_location() {
    let dir = scratch("bad");
    let input = dir.join("bad.tsv");
    fs::write(&input, "1\t2\n2\tabc\n").unwrap();
    let out = bin()
        .args(["-o", "unused.png", "--no-draw"])
        .arg(&input)
        .output()
        .expect("run xyplot");
    assert!(!out.status.success());
    let err = String::from_utf8_lossy(&out.stderr);
    assert!(err.contains(":2: column 2 is not a number"), "{err}");

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn unknown_output_extension_is_rejected() {
    let dir = scratch("ext");
    let input = dir.join("in.tsv");
    fs::write(&input, "1\t2\n2\t3\n").unwrap();
    let out = bin()
        .arg("-o")
        .arg(dir.join("plot.pdf"))
        .arg(&input)
        .output()
        .expect("run xyplot");
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("unsupported output format"));

    let _ = fs::remove_dir_all(dir);
}

#[test]
#[ignore = "needs system fonts"]
fn renders_png_and_svg() {
    let dir = scratch("render");
    let input = dir.join("in.tsv");
    fs::write(&input, "1\t2\t1\t3\n2\t3\t2\t4\n3\t2.5\t2\t3.5\n").unwrap();
    for name in ["plot.png", "plot.svg"] {
        let target = dir.join(name);
        let status = bin()
            .arg("-o")
            .arg(&target)
            .args(["+type", "xymM", "+lb", "range", "+lb", "mean"])
            .args(["+title", "t", "+xl", "x", "+gr", "#dddddd"])
            .arg(&input)
            .status()
            .expect("run xyplot");
        assert!(status.success());
        assert!(fs::metadata(&target).unwrap().len() > 0);
    }
    let _ = fs::remove_dir_all(dir);
}
