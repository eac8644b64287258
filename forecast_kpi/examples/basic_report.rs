use forecast_kpi::render::render_report;
use forecast_kpi::utils::generate_demo_dataset;
use forecast_kpi::{HeatmapMetric, Report, ReportCache, ReportOptions};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Forecast KPI: Basic Report Example");
    println!("==================================\n");

    // Synthetic records: 20 SKUs across categories and regions
    let dataset = generate_demo_dataset(600, 42)?;
    println!("Demo dataset created: {} records\n", dataset.len());

    let options = ReportOptions {
        top_n: 10,
        heatmap_metric: HeatmapMetric::WmapePct,
    };
    let report = Report::generate(&dataset, &options);

    println!("{}", report.overall);
    println!("{}", render_report(&report));

    // A second request for the same data and options is served from the cache
    let mut cache = ReportCache::new();
    cache.get_or_generate(&dataset, &options);
    cache.get_or_generate(&dataset, &options);
    println!("Cached reports: {}", cache.len());

    Ok(())
}
