//! Integration tests for the pafsplit binary: filter, subchains and stats
//! on small hand-written PAF files.

use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use tempfile::TempDir;

fn get_pafsplit_binary() -> PathBuf {
    if let Ok(path) = std::env::var("CARGO_BIN_EXE_pafsplit") {
        return PathBuf::from(path);
    }
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let candidates = [
        manifest_dir.join("target/release/pafsplit"),
        manifest_dir.join("target/debug/pafsplit"),
    ];
    for path in &candidates {
        if path.exists() {
            return path.clone();
        }
    }
    PathBuf::from("pafsplit")
}

fn run_pafsplit(work_dir: &PathBuf, args: &[&str]) -> std::io::Result<std::process::Output> {
    Command::new(get_pafsplit_binary())
        .current_dir(work_dir)
        .args(args)
        .output()
}

fn create_paf_file(work_dir: &PathBuf, name: &str, alignments: &[&str]) -> PathBuf {
    let paf_path = work_dir.join(name);
    let mut file = File::create(&paf_path).unwrap();
    for line in alignments {
        writeln!(file, "{}", line).unwrap();
    }
    paf_path
}

fn read_lines(path: PathBuf) -> Vec<String> {
    fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read {:?}: {}", path, e))
        .lines()
        .map(str::to_string)
        .collect()
}

/// Four reads:
/// - chimera: two pieces 500kb apart on chr1 (listed out of query order)
/// - clean: three nearby pieces on chr1
/// - foldback: forward then reverse over the same chr2 region
/// - lowq: a single alignment below the mapQ threshold
const ALIGNMENTS: &[&str] = &[
    "chimera\t12000\t6000\t12000\t+\tchr1\t2000000\t600000\t606000\t5900\t6000\t60\ttp:A:P\tcm:i:500",
    "chimera\t12000\t0\t6000\t+\tchr1\t2000000\t100000\t106000\t5900\t6000\t60\ttp:A:P\tcm:i:500",
    "clean\t9000\t0\t3000\t+\tchr1\t2000000\t200000\t203000\t2950\t3000\t60\ttp:A:P\tcm:i:200",
    "clean\t9000\t3000\t6000\t+\tchr1\t2000000\t203100\t206100\t2950\t3000\t60\ttp:A:P\tcm:i:200",
    "clean\t9000\t6000\t9000\t+\tchr1\t2000000\t206200\t209200\t2950\t3000\t60\ttp:A:P\tcm:i:200",
    "foldback\t8000\t0\t4000\t+\tchr2\t1000000\t50000\t54000\t3900\t4000\t60\ttp:A:P\tcm:i:300",
    "foldback\t8000\t4000\t8000\t-\tchr2\t1000000\t50000\t54000\t3900\t2000\t60\ttp:A:P\tcm:i:300",
    "lowq\t5000\t0\t5000\t+\tchr3\t1000000\t0\t5000\t4900\t5000\t2\ttp:A:P\tcm:i:300",
];

#[test]
fn test_filter_writes_reports() -> std::io::Result<()> {
    let temp_dir = TempDir::new()?;
    let work_dir = temp_dir.path().to_path_buf();
    create_paf_file(&work_dir, "reads.paf", ALIGNMENTS);

    let output = run_pafsplit(&work_dir, &["filter", "-i", "reads.paf"])?;
    assert!(
        output.status.success(),
        "filter failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    assert_eq!(read_lines(work_dir.join("reads.chimeric_reads.txt")), vec!["chimera"]);
    assert_eq!(
        read_lines(work_dir.join("reads.non_chimeric_reads.txt")),
        vec!["clean", "foldback"]
    );
    assert_eq!(read_lines(work_dir.join("reads.chimer_lengths.txt")), vec!["12000"]);
    assert_eq!(
        read_lines(work_dir.join("reads.non_chimer_lengths.txt")),
        vec!["9000", "8000"]
    );
    assert_eq!(
        read_lines(work_dir.join("reads.chimer_subchains_lengths.txt")),
        vec!["6000", "6000"]
    );
    assert_eq!(
        read_lines(work_dir.join("reads.chimer_subchains.txt")),
        vec!["chimera\t(0,6000),(6000,12000),"]
    );
    assert_eq!(
        read_lines(work_dir.join("reads.palindromes.txt")),
        vec!["foldback\tchr2\t4000\t2000\t2"]
    );

    Ok(())
}

#[test]
fn test_filter_custom_prefix_and_threshold() -> std::io::Result<()> {
    let temp_dir = TempDir::new()?;
    let work_dir = temp_dir.path().to_path_buf();
    create_paf_file(&work_dir, "reads.paf", ALIGNMENTS);

    // With a huge threshold nothing is chimeric
    let args = [
        "filter", "-i", "reads.paf", "-o", "out/all", "--max-gap", "10000000",
    ];
    let output = run_pafsplit(&work_dir, &args);
    // The output directory does not exist yet
    assert!(!output?.status.success());

    fs::create_dir(work_dir.join("out"))?;
    let output = run_pafsplit(&work_dir, &args)?;
    assert!(
        output.status.success(),
        "filter failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(read_lines(work_dir.join("out/all.chimeric_reads.txt")).is_empty());
    assert_eq!(
        read_lines(work_dir.join("out/all.non_chimeric_reads.txt")),
        vec!["chimera", "clean", "foldback"]
    );

    Ok(())
}

#[test]
fn test_filter_reads_stdin() -> std::io::Result<()> {
    let temp_dir = TempDir::new()?;
    let work_dir = temp_dir.path().to_path_buf();

    let mut child = Command::new(get_pafsplit_binary())
        .current_dir(&work_dir)
        .args(["filter", "-i", "-", "-o", "piped"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;
    {
        let mut stdin = child.stdin.take().expect("stdin is piped");
        for line in ALIGNMENTS {
            writeln!(stdin, "{}", line)?;
        }
    }
    let output = child.wait_with_output()?;
    assert!(
        output.status.success(),
        "filter on stdin failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    assert_eq!(read_lines(work_dir.join("piped.chimeric_reads.txt")), vec!["chimera"]);
    assert_eq!(
        read_lines(work_dir.join("piped.non_chimeric_reads.txt")),
        vec!["clean", "foldback"]
    );
    assert_eq!(
        read_lines(work_dir.join("piped.palindromes.txt")),
        vec!["foldback\tchr2\t4000\t2000\t2"]
    );

    Ok(())
}

#[test]
fn test_subchains_output() -> std::io::Result<()> {
    let temp_dir = TempDir::new()?;
    let work_dir = temp_dir.path().to_path_buf();
    create_paf_file(&work_dir, "reads.paf", ALIGNMENTS);

    let output = run_pafsplit(&work_dir, &["subchains", "-i", "reads.paf", "--chimeric-only"])?;
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let expected = "Subchains created for read chimera\n\
                    \t(0,6000)+ chr1 100000 106000 2000000 60\n\n\
                    \t(6000,12000)+ chr1 600000 606000 2000000 60\n\n";
    assert_eq!(stdout, expected);

    Ok(())
}

#[test]
fn test_stats_output() -> std::io::Result<()> {
    let temp_dir = TempDir::new()?;
    let work_dir = temp_dir.path().to_path_buf();
    create_paf_file(&work_dir, "reads.paf", ALIGNMENTS);

    let output = run_pafsplit(&work_dir, &["stats", "-i", "reads.paf"])?;
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Number of reads: 3"));
    assert!(stdout.contains("Number of alignments: 7"));
    assert!(stdout.contains("Chimeric reads: 1"));
    assert!(stdout.contains("Palindrome candidates: 1"));
    assert!(stdout.contains("1. chimera: 2 subchains"));

    Ok(())
}

#[test]
fn test_malformed_input_fails() -> std::io::Result<()> {
    let temp_dir = TempDir::new()?;
    let work_dir = temp_dir.path().to_path_buf();
    create_paf_file(
        &work_dir,
        "bad.paf",
        &[
            ALIGNMENTS[0],
            "chimera\t12000\t0\t6000\t?\tchr1\t2000000\t100000\t106000\t5900\t6000\t60",
        ],
    );

    let output = run_pafsplit(&work_dir, &["filter", "-i", "bad.paf"])?;
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("line 2"), "unexpected stderr: {}", stderr);
    assert!(!work_dir.join("bad.chimeric_reads.txt").exists());

    let output = run_pafsplit(&work_dir, &["filter", "-i", "missing.paf"])?;
    assert!(!output.status.success());

    Ok(())
}
