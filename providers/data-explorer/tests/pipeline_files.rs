use std::collections::HashMap;
use std::fs;
use std::path::Path;

use data_explorer::{
    run_catalog_cleaning, run_harmonization, summarize, Dataset, Explorer, ExplorerConfig,
};
use frame_common::{read_csv, ExtremesRequest};
use happiness_common::{read_normalized_csv, HarmonizePlan, COMBINED_FILE_NAME};
use pretty_assertions::assert_eq;

fn write(dir: &Path, name: &str, body: &str) {
    fs::write(dir.join(name), body).unwrap();
}

fn seed(dir: &Path) {
    write(
        dir,
        "2015.csv",
        "Country,Region,Happiness Rank,Happiness Score,Standard Error,Economy (GDP per Capita),Family,Health (Life Expectancy),Freedom,Trust (Government Corruption),Generosity,Dystopia Residual\n\
         Switzerland,Western Europe,1,7.587,0.03411,1.39651,1.34951,0.94143,0.66557,0.41978,0.29678,2.51738\n\
         Togo,Sub-Saharan Africa,158,2.839,0.06727,0.20868,0.13995,0.28443,0.36453,0.10731,0.16681,1.56726\n",
    );
    write(
        dir,
        "2016.csv",
        "Country,Region,Happiness Rank,Happiness Score,Lower Confidence Interval,Upper Confidence Interval,Economy (GDP per Capita),Family,Health (Life Expectancy),Freedom,Trust (Government Corruption),Generosity,Dystopia Residual\n\
         Denmark,Western Europe,1,7.526,7.46,7.592,1.44178,1.16374,0.79504,0.57941,0.44453,0.36171,2.73939\n\
         Togo,Sub-Saharan Africa,155,3.303,3.192,3.414,0.28123,0,0.24811,0.34678,0.11587,0.17517,2.1354\n",
    );
    write(
        dir,
        "2017.csv",
        "Country,Happiness.Rank,Happiness.Score,Whisker.high,Whisker.low,Economy..GDP.per.Capita.,Family,Health..Life.Expectancy.,Freedom,Generosity,Trust..Government.Corruption.,Dystopia.Residual\n\
         Norway,1,7.537,7.594,7.479,1.616,1.533,0.796,0.635,0.362,0.315,2.277\n\
         Togo,150,3.495,3.594,3.395,0.305,0.431,0.247,0.380,0.196,0.095,1.837\n",
    );
    for (year, top) in [("2018", "7.632"), ("2019", "7.769")] {
        write(
            dir,
            &format!("{year}.csv"),
            &format!(
                "Overall rank,Country or region,Score,GDP per capita,Social support,Healthy life expectancy,Freedom to make life choices,Generosity,Perceptions of corruption\n\
                 1,Finland,{top},1.305,1.592,0.874,0.681,0.202,0.393\n\
                 2,Denmark,7.555,1.351,1.590,0.868,0.683,0.284,0.408\n\
                 139,Togo,3.999,0.259,0.474,0.253,0.434,0.158,0.101\n"
            ),
        );
    }
    write(
        dir,
        "netflix_titles.csv",
        "show_id,type,title,director,cast,country,date_added,release_year,rating,duration,listed_in,description\n\
         s1,Movie,Dick Johnson Is Dead,Kirsten Johnson,,United States,\"September 25, 2021\",2020,PG-13,90 min,Documentaries,\"A filmmaker, and her father.\"\n\
         s2,TV Show,Blood & Water,,\"Ama Qamata, Khosi Ngema\",South Africa,\"September 24, 2021\",2021,TV-MA,2 Seasons,\"International TV Shows, TV Dramas\",After crossing paths.\n\
         s3,TV Show,Kota Factory,,Mayur More,\"India, United States\",\" September 24, 2021\",2021,TV-MA,1 Season,\"Romantic TV Shows, TV Comedies\",In a city.\n\
         s4,Movie,Sankofa,Haile Gerima,,United States,\"September 24, 2021\",1993,TV-MA,125 min,\"Dramas, Independent Movies\",On a photo shoot.\n",
    );
}

fn config(data: &Path, out: &Path, extra: &[(&str, &str)]) -> ExplorerConfig {
    let mut props: HashMap<String, String> = HashMap::new();
    props.insert("explorer_data_dir".into(), data.display().to_string());
    props.insert("explorer_output_dir".into(), out.display().to_string());
    for (k, v) in extra {
        props.insert(k.to_string(), v.to_string());
    }
    ExplorerConfig::from_properties(&props)
}

#[test]
fn harmonization_pipeline_exports_combined_table() {
    let data = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    seed(data.path());

    let run = run_harmonization(&config(data.path(), out.path(), &[])).unwrap();

    assert_eq!(run.table.height(), 2 + 2 + 2 + 3 + 3);
    assert_eq!(run.report.unmatched_countries, vec!["Finland", "Norway"]);
    let path = run.exported_to.clone().unwrap();
    assert_eq!(path, out.path().join(COMBINED_FILE_NAME));
    assert!(read_normalized_csv(&path).unwrap().equals_missing(&run.table));
}

#[test]
fn export_can_be_disabled() {
    let data = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    seed(data.path());

    let config = config(data.path(), out.path(), &[("EXPLORER_EXPORT", "false")]);
    let run = run_harmonization(&config).unwrap();

    assert_eq!(run.exported_to, None);
    assert!(!out.path().join(COMBINED_FILE_NAME).exists());
}

#[test]
fn plan_file_and_authority_override_are_honoured() {
    let data = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    seed(data.path());

    let plan_path = data.path().join("plan.json");
    fs::write(
        &plan_path,
        serde_json::to_string(&HarmonizePlan::world_happiness()).unwrap(),
    )
    .unwrap();

    let config = config(
        data.path(),
        out.path(),
        &[
            ("EXPLORER_PLAN_PATH", plan_path.to_str().unwrap()),
            ("EXPLORER_AUTHORITATIVE_REGION_YEAR", "2015"),
        ],
    );
    let run = run_harmonization(&config).unwrap();

    // 2015 has no Denmark, so it joins the unmatched set
    assert_eq!(
        run.report.unmatched_countries,
        vec!["Denmark", "Finland", "Norway"]
    );
}

#[test]
fn missing_yearly_file_fails_the_run() {
    let data = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    seed(data.path());
    fs::remove_file(data.path().join("2019.csv")).unwrap();

    let err = run_harmonization(&config(data.path(), out.path(), &[])).unwrap_err();
    assert!(format!("{err:#}").contains("2019"));
}

#[test]
fn catalog_pipeline_exports_cleaned_table() {
    let data = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    seed(data.path());

    let run = run_catalog_cleaning(&config(data.path(), out.path(), &[])).unwrap();

    assert_eq!(run.report.rows, 4);
    assert_eq!(run.report.unparsed_dates, 0);
    assert_eq!(run.table.width(), 13);
    let reloaded = read_csv(run.exported_to.unwrap()).unwrap();
    assert_eq!(reloaded.height(), 4);
}

#[test]
fn missing_catalog_fails_the_run() {
    let data = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    seed(data.path());

    let config = config(data.path(), out.path(), &[("EXPLORER_CATALOG_FILE", "absent.csv")]);
    assert!(run_catalog_cleaning(&config).is_err());
}

#[test]
fn summary_covers_both_datasets() {
    let data = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    seed(data.path());
    let config = config(data.path(), out.path(), &[("EXPLORER_TOP_N", "1")]);

    let happiness = run_harmonization(&config).unwrap();
    let catalog = run_catalog_cleaning(&config).unwrap();
    let explorer = Explorer::new()
        .with_happiness(happiness.table.clone())
        .with_catalog(catalog.table.clone());

    let summary = summarize(&explorer, &happiness, &catalog, config.top_n).unwrap();

    let top: Vec<&str> = summary
        .happiness
        .top
        .iter()
        .map(|r| r.country.as_str())
        .collect();
    assert_eq!(top, vec!["Switzerland", "Denmark", "Norway", "Finland", "Finland"]);
    assert!(summary.happiness.bottom.iter().all(|r| r.country == "Togo"));
    assert_eq!(summary.happiness.kpis.len(), 5);
    assert_eq!(summary.catalog.kpis[0].total_titles, 4);
    assert_eq!(summary.catalog.top_countries[0].value, "United States");
    assert_eq!(summary.cache.misses, 2);
    assert_eq!(summary.happiness.correlations.columns.len(), 7);
    assert_eq!(
        summary.happiness.correlations.get("Score", "Score"),
        Some(1.0)
    );
    assert!(summary.happiness.correlations.get("Score", "GDP_per_Capita").unwrap() > 0.5);
    assert_eq!(summary.catalog.correlations.columns.len(), 7);
    assert!(summary.catalog.correlations.get("year_added", "release_year").is_none());

    // the same views are now served from the cache
    let again = explorer
        .extremes(
            Dataset::Happiness,
            &ExtremesRequest::top("Year", "Score").with_n(1),
        )
        .unwrap();
    assert_eq!(again.height(), 5);
    assert_eq!(explorer.cache_stats().hits, 1);

    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["happiness"]["report"]["total_rows"], 12);
}
