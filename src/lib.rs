pub mod analyze;
pub mod error;
pub mod load;
pub mod report;
pub mod schema;

use std::path::Path;

use crate::analyze::PublisherAnalysis;
use crate::error::AnalysisError;

/// Load the sales file at `path` and run the full publisher analysis.
pub fn run_analysis<P: AsRef<Path>>(path: P) -> Result<PublisherAnalysis, AnalysisError> {
    let table = load::load_sales_table(path)?;
    analyze::analyze_publisher_sales(&table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn file_to_report_end_to_end() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(
            file,
            "title|publisher|developer|release_date|platform|total_sales|na_sales|japan_sales|pal_sales|other_sales|user_score|critic_score"
        )?;
        // A totals 30.0 NA in window; B 5.0; C is outside the window
        writeln!(file, "One|A|dev|2007-05-01|PS3|12.0|10.0|0.5|1.0|0.5|7.0|8.0")?;
        writeln!(file, "Two|A|dev|2008-05-01|X360|25.0|20.0|0.5|3.0|1.5|7.5|8.5")?;
        writeln!(file, "Three|B|dev|2009-05-01|Wii|6.0|5.0|0.1|0.8|0.1|6.0|7.0")?;
        writeln!(file, "Four|C|dev|2020-05-01|PS5|120.0|100.0|5.0|12.0|3.0|9.0|9.5")?;
        // A again, but with unparseable na_sales: counts as missing
        writeln!(file, "Five|A|dev|2010-05-01|PC|3.0|??|0.0|0.2|0.1|6.5|7.5")?;
        file.flush()?;

        let analysis = run_analysis(file.path())?;
        assert_eq!(analysis.best_publisher, "A");
        assert_eq!(analysis.missing_count, 1);
        let years: Vec<i32> = analysis.yearly_sales.iter().map(|y| y.year).collect();
        assert_eq!(years, vec![2007, 2008, 2010]);
        assert_eq!(analysis.yearly_sales[0].na_total, Some(10.0));
        assert_eq!(analysis.yearly_sales[2].na_total, None);
        assert_eq!(analysis.yearly_sales[2].global_total, Some(3.0));

        let mut out = Vec::new();
        report::render_analysis(&analysis, &mut out)?;
        let text = String::from_utf8(out)?;
        assert!(text.contains("'A'"));
        assert!(text.contains("missing sales data for North America: 1"));
        Ok(())
    }
}
