//! Test runner and statistics

use crate::error::TestResult;
use crate::vm_test::{VmTestResults, VmTestRunner};
use std::path::Path;
use std::time::{Duration, Instant};

/// Aggregated test statistics
#[derive(Debug, Default)]
pub struct TestStats {
    /// Total tests executed
    pub total: usize,
    /// Tests passed
    pub passed: usize,
    /// Tests failed
    pub failed: usize,
    /// Total execution time
    pub duration: Duration,
    /// Failed test names with reasons
    pub failures: Vec<(String, String)>,
}

impl TestStats {
    /// Create empty stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the results of one file
    pub fn add_vm_results(&mut self, results: &VmTestResults) {
        self.total += results.total();
        self.passed += results.passed.len();
        self.failed += results.failed.len();
        for (name, reason) in &results.failed {
            self.failures.push((name.clone(), reason.clone()));
        }
    }

    /// Pass rate as percentage
    pub fn pass_rate(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        (self.passed as f64 / self.total as f64) * 100.0
    }

    /// Print summary
    pub fn print_summary(&self) {
        println!("\n========================================");
        println!("Test Summary");
        println!("========================================");
        println!("Total:   {}", self.total);
        println!("Passed:  {}", self.passed);
        println!("Failed:  {}", self.failed);
        println!("Pass Rate: {:.2}%", self.pass_rate());
        println!("Duration: {:.2}s", self.duration.as_secs_f64());

        if !self.failures.is_empty() {
            println!("\nFailed tests:");
            for (name, reason) in &self.failures {
                println!("  - {}: {}", name, reason);
            }
        }
    }
}

/// Walks a directory tree of fixture files
pub struct TestRunner {
    /// Per-file runner
    vm_runner: VmTestRunner,
    /// Verbose output
    verbose: bool,
}

impl TestRunner {
    /// Create new test runner
    pub fn new(verbose: bool) -> Self {
        Self {
            vm_runner: VmTestRunner::new(verbose),
            verbose,
        }
    }

    /// Run every `.json` fixture under `dir`
    pub fn run_dir(&self, dir: &Path) -> TestResult<TestStats> {
        let mut stats = TestStats::new();
        let start = Instant::now();

        if self.verbose {
            tracing::info!("Running fixtures from: {:?}", dir);
        }

        self.run_recursive(dir, &mut stats)?;

        stats.duration = start.elapsed();
        Ok(stats)
    }

    fn run_recursive(&self, dir: &Path, stats: &mut TestStats) -> TestResult<()> {
        if !dir.exists() {
            if self.verbose {
                tracing::warn!("Directory not found: {:?}", dir);
            }
            return Ok(());
        }

        let mut entries = std::fs::read_dir(dir)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<Result<Vec<_>, _>>()?;
        entries.sort();

        for path in entries {
            if path.is_dir() {
                self.run_recursive(&path, stats)?;
            } else if path.extension().is_some_and(|e| e == "json") {
                match self.vm_runner.run_file(&path) {
                    Ok(results) => {
                        if self.verbose && !results.failed.is_empty() {
                            tracing::warn!(
                                "File: {:?} - {} passed, {} failed",
                                path,
                                results.passed.len(),
                                results.failed.len()
                            );
                        }
                        stats.add_vm_results(&results);
                    }
                    // An unreadable file counts as one failure
                    Err(e) => {
                        stats.total += 1;
                        stats.failed += 1;
                        stats
                            .failures
                            .push((path.to_string_lossy().to_string(), e.to_string()));
                    }
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_pass_rate() {
        let mut stats = TestStats::new();
        stats.total = 100;
        stats.passed = 90;
        stats.failed = 10;
        assert!((stats.pass_rate() - 90.0).abs() < 0.01);
    }

    #[test]
    fn test_stats_empty() {
        let stats = TestStats::new();
        assert_eq!(stats.pass_rate(), 100.0);
    }

    #[test]
    fn test_add_vm_results() {
        let mut results = VmTestResults::new("a.json".to_string());
        results.passed.push("ok".to_string());
        results.failed.push(("bad".to_string(), "stack mismatch".to_string()));

        let mut stats = TestStats::new();
        stats.add_vm_results(&results);
        assert_eq!((stats.total, stats.passed, stats.failed), (2, 1, 1));
        assert_eq!(stats.failures[0].0, "bad");
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let runner = TestRunner::new(false);
        let stats = runner.run_dir(Path::new("does/not/exist")).unwrap();
        assert_eq!(stats.total, 0);
        assert!(!runner.verbose);
    }
}
