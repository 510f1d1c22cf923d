// ═══════════════════════════════════════════════════════════════════
// Service Tests — TransformService, AxisService, SummaryService,
// ChartService
// ═══════════════════════════════════════════════════════════════════

use chrono::NaiveDate;

use drivethru_analytics_core::models::chart::{AxisDomain, ChartDataPoint, ChartRenderState};
use drivethru_analytics_core::models::daily::{CategoryMetrics, DailyMetricRow};
use drivethru_analytics_core::models::metrics::{
    Category, CategorySelection, MetricType, TimeRange, ViewMode,
};
use drivethru_analytics_core::models::preferences::ChartPreferences;
use drivethru_analytics_core::services::axis_service::AxisService;
use drivethru_analytics_core::services::chart_service::{ChartService, FetchState};
use drivethru_analytics_core::services::summary_service::SummaryService;
use drivethru_analytics_core::services::transform_service::TransformService;

// ═══════════════════════════════════════════════════════════════════
// Helpers
// ═══════════════════════════════════════════════════════════════════

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn assert_domain(actual: AxisDomain, min: f64, max: f64) {
    assert!(
        approx(actual.min, min) && approx(actual.max, max),
        "expected [{min}, {max}], got [{}, {}]",
        actual.min,
        actual.max
    );
}

fn metrics(opportunities: f64, offers: f64, successes: f64, revenue: f64) -> CategoryMetrics {
    CategoryMetrics {
        opportunities,
        offers,
        successes,
        revenue,
        conversion_rate: None,
    }
}

/// A row carrying only revenue for all three categories.
fn revenue_row(day: &str, upsell: f64, upsize: f64, addon: f64) -> DailyMetricRow {
    DailyMetricRow::new(date(day))
        .with_category(Category::Upsell, metrics(0.0, 0.0, 0.0, upsell))
        .with_category(Category::Upsize, metrics(0.0, 0.0, 0.0, upsize))
        .with_category(Category::Addon, metrics(0.0, 0.0, 0.0, addon))
}

/// A row carrying only a precomputed conversion rate for all three categories.
fn rate_row(day: &str, upsell: f64, upsize: f64, addon: f64) -> DailyMetricRow {
    let rate = |r: f64| CategoryMetrics {
        conversion_rate: Some(r),
        ..Default::default()
    };
    DailyMetricRow::new(date(day))
        .with_category(Category::Upsell, rate(upsell))
        .with_category(Category::Upsize, rate(upsize))
        .with_category(Category::Addon, rate(addon))
}

fn points(rows: &[DailyMetricRow], metric: MetricType, sel: &CategorySelection) -> Vec<ChartDataPoint> {
    TransformService::new().transform(rows, metric, sel)
}

/// A spread of shapes used by the invariant checks below.
fn sample_series() -> Vec<Vec<DailyMetricRow>> {
    vec![
        vec![revenue_row("2024-01-01", 0.0, 0.0, 0.0)],
        vec![revenue_row("2024-01-01", 1.0, 2.0, 3.0)],
        vec![revenue_row("2024-01-01", 10.0, 20.0, 0.0)],
        vec![
            revenue_row("2024-01-01", 120.0, 80.0, 15.0),
            revenue_row("2024-01-02", 300.0, 10.0, 0.0),
            revenue_row("2024-01-03", 5.0, 500.0, 42.0),
        ],
        vec![
            revenue_row("2024-01-01", 9000.0, 9100.0, 9050.0),
            revenue_row("2024-01-02", 9020.0, 9080.0, 9070.0),
        ],
        vec![
            revenue_row("2024-01-01", 0.5, 0.25, 0.75),
            revenue_row("2024-01-02", 0.1, 0.2, 0.3),
        ],
    ]
}

fn selections() -> Vec<CategorySelection> {
    vec![
        CategorySelection::all(),
        CategorySelection::single(Category::Upsell),
        CategorySelection::single(Category::Addon),
        CategorySelection::new([Category::Upsize, Category::Addon]).unwrap(),
    ]
}

// ═══════════════════════════════════════════════════════════════════
// TransformService
// ═══════════════════════════════════════════════════════════════════

mod transform {
    use super::*;

    #[test]
    fn example_revenue_row() {
        let rows = vec![revenue_row("2024-01-01", 10.0, 20.0, 0.0)];
        let pts = points(&rows, MetricType::Revenue, &CategorySelection::all());

        assert_eq!(pts.len(), 1);
        assert_eq!(pts[0].date, date("2024-01-01"));
        assert_eq!(pts[0].value(Category::Upsell), Some(10.0));
        assert_eq!(pts[0].value(Category::Upsize), Some(20.0));
        assert_eq!(pts[0].value(Category::Addon), Some(0.0));
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let pts = points(&[], MetricType::Revenue, &CategorySelection::all());
        assert!(pts.is_empty());
    }

    #[test]
    fn all_zero_day_yields_zero_for_every_selected_category() {
        let rows = vec![DailyMetricRow::new(date("2024-01-05"))
            .with_category(Category::Upsell, CategoryMetrics::default())
            .with_category(Category::Upsize, CategoryMetrics::default())
            .with_category(Category::Addon, CategoryMetrics::default())];

        for metric in MetricType::ALL {
            for sel in selections() {
                let pts = points(&rows, metric, &sel);
                for category in sel.iter() {
                    let v = pts[0].value(category).unwrap();
                    assert_eq!(v, 0.0, "{metric} / {category}");
                    assert!(!v.is_nan());
                }
            }
        }
    }

    #[test]
    fn only_selected_categories_are_projected() {
        let rows = vec![revenue_row("2024-01-01", 1.0, 2.0, 3.0)];
        let sel = CategorySelection::new([Category::Upsell, Category::Addon]).unwrap();
        let pts = points(&rows, MetricType::Revenue, &sel);
        assert_eq!(pts[0].values.len(), 2);
        assert_eq!(pts[0].value(Category::Upsize), None);
    }

    #[test]
    fn missing_categories_are_not_fabricated() {
        let rows = vec![DailyMetricRow::new(date("2024-01-01"))
            .with_category(Category::Upsize, metrics(10.0, 5.0, 2.0, 7.0))];
        let pts = points(&rows, MetricType::Offers, &CategorySelection::all());
        assert_eq!(pts[0].values.len(), 1);
        assert_eq!(pts[0].value(Category::Upsize), Some(5.0));
        assert_eq!(pts[0].value(Category::Upsell), None);
    }

    #[test]
    fn projects_each_metric_field() {
        let rows = vec![DailyMetricRow::new(date("2024-01-01"))
            .with_category(Category::Upsell, metrics(40.0, 20.0, 5.0, 12.5))];
        let sel = CategorySelection::single(Category::Upsell);

        let value = |metric| points(&rows, metric, &sel)[0].value(Category::Upsell).unwrap();
        assert_eq!(value(MetricType::Opportunities), 40.0);
        assert_eq!(value(MetricType::Offers), 20.0);
        assert_eq!(value(MetricType::Successes), 5.0);
        assert_eq!(value(MetricType::Revenue), 12.5);
        assert_eq!(value(MetricType::ConversionRate), 25.0);
    }

    #[test]
    fn non_finite_values_become_zero() {
        let rows = vec![DailyMetricRow::new(date("2024-01-01")).with_category(
            Category::Addon,
            CategoryMetrics {
                revenue: f64::NAN,
                conversion_rate: Some(f64::INFINITY),
                ..Default::default()
            },
        )];
        let sel = CategorySelection::single(Category::Addon);
        assert_eq!(points(&rows, MetricType::Revenue, &sel)[0].value(Category::Addon), Some(0.0));
        assert_eq!(
            points(&rows, MetricType::ConversionRate, &sel)[0].value(Category::Addon),
            Some(0.0)
        );
    }

    #[test]
    fn preserves_row_order_and_count() {
        let rows = vec![
            revenue_row("2024-01-01", 1.0, 1.0, 1.0),
            revenue_row("2024-01-02", 2.0, 2.0, 2.0),
            revenue_row("2024-01-03", 3.0, 3.0, 3.0),
        ];
        let pts = points(&rows, MetricType::Revenue, &CategorySelection::all());
        let dates: Vec<_> = pts.iter().map(|p| p.date).collect();
        assert_eq!(dates, rows.iter().map(|r| r.date).collect::<Vec<_>>());
    }

    #[test]
    fn deterministic() {
        let rows = sample_series().concat();
        let sel = CategorySelection::all();
        assert_eq!(
            points(&rows, MetricType::Revenue, &sel),
            points(&rows, MetricType::Revenue, &sel)
        );
    }
}

// ═══════════════════════════════════════════════════════════════════
// AxisService
// ═══════════════════════════════════════════════════════════════════

mod axis {
    use super::*;

    fn domain(rows: &[DailyMetricRow], metric: MetricType, sel: &CategorySelection, view: ViewMode) -> AxisDomain {
        let pts = points(rows, metric, sel);
        AxisService::new().compute_domain(&pts, sel, view, metric)
    }

    #[test]
    fn empty_series_uses_default_range() {
        let sel = CategorySelection::all();
        for metric in MetricType::ALL {
            for view in [ViewMode::Stacked, ViewMode::Individual] {
                assert_eq!(
                    AxisService::new().compute_domain(&[], &sel, view, metric),
                    AxisDomain::new(0.0, 100.0)
                );
            }
        }
    }

    #[test]
    fn stacked_example_pads_daily_sum() {
        let rows = vec![revenue_row("2024-01-01", 10.0, 20.0, 0.0)];
        let d = domain(&rows, MetricType::Revenue, &CategorySelection::all(), ViewMode::Stacked);
        assert_domain(d, 0.0, 36.0);
    }

    #[test]
    fn stacked_uses_largest_daily_sum() {
        let rows = vec![
            revenue_row("2024-01-01", 100.0, 0.0, 0.0),
            revenue_row("2024-01-02", 40.0, 40.0, 40.0),
        ];
        let d = domain(&rows, MetricType::Revenue, &CategorySelection::all(), ViewMode::Stacked);
        assert_domain(d, 0.0, 144.0);
    }

    #[test]
    fn stacked_ignores_unselected_categories() {
        let rows = vec![revenue_row("2024-01-01", 10.0, 20.0, 500.0)];
        let sel = CategorySelection::new([Category::Upsell, Category::Upsize]).unwrap();
        let d = domain(&rows, MetricType::Revenue, &sel, ViewMode::Stacked);
        assert_domain(d, 0.0, 36.0);
    }

    #[test]
    fn individual_tracks_min_and_max() {
        let rows = vec![
            revenue_row("2024-01-01", 10.0, 20.0, 30.0),
            revenue_row("2024-01-02", 50.0, 5.0, 25.0),
        ];
        let d = domain(&rows, MetricType::Revenue, &CategorySelection::all(), ViewMode::Individual);
        // max 50 → 60; min 5 − 2.5 = 2.5
        assert_domain(d, 2.5, 60.0);
    }

    #[test]
    fn individual_min_is_floored_at_zero() {
        let rows = vec![revenue_row("2024-01-01", 1.0, 100.0, 50.0)];
        let d = domain(&rows, MetricType::Revenue, &CategorySelection::all(), ViewMode::Individual);
        assert_domain(d, 0.0, 120.0);
    }

    #[test]
    fn individual_keeps_high_floor_for_large_flat_values() {
        let rows = vec![
            revenue_row("2024-01-01", 100.0, 105.0, 102.0),
            revenue_row("2024-01-02", 101.0, 104.0, 103.0),
        ];
        let d = domain(&rows, MetricType::Revenue, &CategorySelection::all(), ViewMode::Individual);
        assert_domain(d, 100.0 - 105.0 * 0.05, 126.0);
    }

    #[test]
    fn all_zero_series_widens_to_ten() {
        let rows = vec![revenue_row("2024-01-01", 0.0, 0.0, 0.0)];
        for view in [ViewMode::Stacked, ViewMode::Individual] {
            let d = domain(&rows, MetricType::Revenue, &CategorySelection::all(), view);
            assert_domain(d, 0.0, 10.0);
        }
    }

    #[test]
    fn narrow_span_widens_from_zero() {
        let rows = vec![revenue_row("2024-01-01", 1.0, 2.0, 1.5)];
        let d = domain(&rows, MetricType::Revenue, &CategorySelection::all(), ViewMode::Individual);
        assert_domain(d, 0.0, 10.0);
    }

    #[test]
    fn points_without_selected_values_plot_as_zero() {
        let rows = vec![DailyMetricRow::new(date("2024-01-01"))
            .with_category(Category::Upsell, metrics(5.0, 5.0, 5.0, 5.0))];
        let sel = CategorySelection::single(Category::Addon);
        let d = domain(&rows, MetricType::Revenue, &sel, ViewMode::Individual);
        assert_domain(d, 0.0, 10.0);
    }

    #[test]
    fn conversion_rate_is_never_stacked() {
        let rows = vec![rate_row("2024-01-01", 40.0, 50.0, 30.0)];
        let stacked = domain(&rows, MetricType::ConversionRate, &CategorySelection::all(), ViewMode::Stacked);
        let individual = domain(&rows, MetricType::ConversionRate, &CategorySelection::all(), ViewMode::Individual);
        assert_domain(stacked, 0.0, 60.0);
        assert_eq!(stacked, individual);
    }

    #[test]
    fn conversion_rate_capped_at_hundred() {
        let rows = vec![rate_row("2024-01-01", 95.0, 150.0, 20.0)];
        let d = domain(&rows, MetricType::ConversionRate, &CategorySelection::all(), ViewMode::Individual);
        assert_domain(d, 0.0, 100.0);
    }

    #[test]
    fn conversion_rate_ceiling_never_below_ten() {
        let rows = vec![rate_row("2024-01-01", 2.0, 3.0, 1.0)];
        let d = domain(&rows, MetricType::ConversionRate, &CategorySelection::all(), ViewMode::Individual);
        assert_domain(d, 0.0, 10.0);
    }

    #[test]
    fn conversion_rate_min_pinned_to_zero() {
        let rows = vec![rate_row("2024-01-01", 60.0, 70.0, 65.0)];
        let d = domain(&rows, MetricType::ConversionRate, &CategorySelection::all(), ViewMode::Individual);
        assert_domain(d, 0.0, 84.0);
    }

    // ── Invariants over a spread of inputs ─────────────────────────

    #[test]
    fn stacked_max_covers_true_daily_sum() {
        for rows in sample_series() {
            for sel in selections() {
                for metric in MetricType::ALL.into_iter().filter(|m| m.is_additive()) {
                    let pts = points(&rows, metric, &sel);
                    let d = AxisService::new().compute_domain(&pts, &sel, ViewMode::Stacked, metric);
                    let true_max = pts
                        .iter()
                        .map(|p| p.stacked_total(&sel))
                        .fold(0.0, f64::max);
                    assert!(d.max >= true_max, "{metric}: {} < {true_max}", d.max);
                    assert_eq!(d.min, 0.0);
                }
            }
        }
    }

    #[test]
    fn conversion_rate_range_within_percent_bounds() {
        let series = vec![
            vec![rate_row("2024-01-01", 0.0, 0.0, 0.0)],
            vec![rate_row("2024-01-01", 5.0, 7.0, 9.0)],
            vec![rate_row("2024-01-01", 99.0, 100.0, 100.0)],
            vec![
                rate_row("2024-01-01", 1000.0, 2000.0, 3000.0),
                rate_row("2024-01-02", 10.0, 20.0, 30.0),
            ],
        ];
        for rows in series {
            for sel in selections() {
                for view in [ViewMode::Stacked, ViewMode::Individual] {
                    let d = domain(&rows, MetricType::ConversionRate, &sel, view);
                    assert!(d.min >= 0.0 && d.max <= 100.0, "[{}, {}]", d.min, d.max);
                    assert!(d.max >= 10.0);
                }
            }
        }
    }

    #[test]
    fn span_is_at_least_ten() {
        for rows in sample_series() {
            for sel in selections() {
                for metric in MetricType::ALL {
                    for view in [ViewMode::Stacked, ViewMode::Individual] {
                        let d = domain(&rows, metric, &sel, view);
                        assert!(d.span() >= 10.0 - 1e-9, "{metric}/{view}: span {}", d.span());
                    }
                }
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════
// SummaryService
// ═══════════════════════════════════════════════════════════════════

mod summary {
    use super::*;

    fn rows() -> Vec<DailyMetricRow> {
        vec![
            DailyMetricRow::new(date("2024-01-01"))
                .with_category(Category::Upsell, metrics(20.0, 10.0, 5.0, 15.0))
                .with_category(Category::Addon, metrics(8.0, 4.0, 1.0, 2.0)),
            DailyMetricRow::new(date("2024-01-02"))
                .with_category(Category::Upsell, metrics(30.0, 10.0, 1.0, 45.0)),
        ]
    }

    #[test]
    fn sums_additive_metrics() {
        let out = SummaryService::new().summarize(&rows(), MetricType::Revenue, &CategorySelection::all());
        assert_eq!(out.len(), 3);

        let upsell = &out[0];
        assert_eq!(upsell.category, Category::Upsell);
        assert_eq!(upsell.total, 60.0);
        assert_eq!(upsell.daily_average, 30.0);
        assert_eq!(upsell.best_day, Some(date("2024-01-02")));
        assert_eq!(upsell.days_reported, 2);
    }

    #[test]
    fn conversion_rate_uses_window_ratio() {
        let sel = CategorySelection::single(Category::Upsell);
        let out = SummaryService::new().summarize(&rows(), MetricType::ConversionRate, &sel);
        // (5 + 1) / (10 + 10) = 30%, not 50% + 10%
        assert!(approx(out[0].total, 30.0));
        assert!(approx(out[0].daily_average, 30.0));
        assert_eq!(out[0].best_day, Some(date("2024-01-01")));
    }

    #[test]
    fn unreported_category_is_zeroed() {
        let sel = CategorySelection::single(Category::Upsize);
        let out = SummaryService::new().summarize(&rows(), MetricType::Offers, &sel);
        assert_eq!(out[0].total, 0.0);
        assert_eq!(out[0].daily_average, 0.0);
        assert_eq!(out[0].best_day, None);
        assert_eq!(out[0].days_reported, 0);
    }

    #[test]
    fn tie_keeps_earliest_day() {
        let rows = vec![
            revenue_row("2024-01-01", 5.0, 0.0, 0.0),
            revenue_row("2024-01-02", 5.0, 0.0, 0.0),
        ];
        let sel = CategorySelection::single(Category::Upsell);
        let out = SummaryService::new().summarize(&rows, MetricType::Revenue, &sel);
        assert_eq!(out[0].best_day, Some(date("2024-01-01")));
    }
}

// ═══════════════════════════════════════════════════════════════════
// ChartService
// ═══════════════════════════════════════════════════════════════════

mod chart {
    use super::*;

    fn prefs(view: ViewMode, metric: MetricType) -> ChartPreferences {
        ChartPreferences {
            metric,
            categories: CategorySelection::all(),
            view,
            range: TimeRange::Last30Days,
        }
    }

    #[test]
    fn no_locations_wins_over_everything() {
        let mut svc = ChartService::new();
        let loaded = FetchState::Loaded(vec![revenue_row("2024-01-01", 1.0, 2.0, 3.0)]);
        for fetch in [FetchState::Idle, FetchState::Loading, FetchState::Failed("x".into()), loaded] {
            assert_eq!(
                svc.render_state(false, &fetch, 1, &ChartPreferences::default()),
                ChartRenderState::NoLocationsSelected
            );
        }
    }

    #[test]
    fn loading_while_idle_or_in_flight() {
        let mut svc = ChartService::new();
        let p = ChartPreferences::default();
        assert_eq!(svc.render_state(true, &FetchState::Idle, 0, &p), ChartRenderState::Loading);
        assert_eq!(svc.render_state(true, &FetchState::Loading, 0, &p), ChartRenderState::Loading);
    }

    #[test]
    fn no_data_on_failure_or_empty() {
        let mut svc = ChartService::new();
        let p = ChartPreferences::default();
        assert_eq!(
            svc.render_state(true, &FetchState::Failed("timeout".into()), 1, &p),
            ChartRenderState::NoData
        );
        assert_eq!(
            svc.render_state(true, &FetchState::Loaded(vec![]), 1, &p),
            ChartRenderState::NoData
        );
    }

    #[test]
    fn ready_carries_points_domain_and_effective_view() {
        let mut svc = ChartService::new();
        let fetch = FetchState::Loaded(vec![revenue_row("2024-01-01", 10.0, 20.0, 0.0)]);

        match svc.render_state(true, &fetch, 1, &prefs(ViewMode::Stacked, MetricType::Revenue)) {
            ChartRenderState::Ready { points, domain, view } => {
                assert_eq!(points.len(), 1);
                assert_domain(domain, 0.0, 36.0);
                assert_eq!(view, ViewMode::Stacked);
            }
            other => panic!("expected Ready, got {other:?}"),
        }

        match svc.render_state(true, &fetch, 1, &prefs(ViewMode::Stacked, MetricType::ConversionRate)) {
            ChartRenderState::Ready { view, .. } => assert_eq!(view, ViewMode::Individual),
            other => panic!("expected Ready, got {other:?}"),
        }
    }

    #[test]
    fn series_is_memoized_per_generation() {
        let mut svc = ChartService::new();
        let sel = CategorySelection::all();
        let first = vec![revenue_row("2024-01-01", 1.0, 2.0, 3.0)];
        let second = vec![revenue_row("2024-01-01", 7.0, 8.0, 9.0)];

        let a = svc.series(&first, 1, MetricType::Revenue, &sel);
        // Same generation: the memo is returned even though rows differ.
        let b = svc.series(&second, 1, MetricType::Revenue, &sel);
        assert_eq!(a, b);

        let c = svc.series(&second, 2, MetricType::Revenue, &sel);
        assert_eq!(c[0].value(Category::Upsell), Some(7.0));
    }

    #[test]
    fn memo_tracks_metric_and_selection() {
        let mut svc = ChartService::new();
        let rows = vec![DailyMetricRow::new(date("2024-01-01"))
            .with_category(Category::Upsell, metrics(40.0, 20.0, 5.0, 12.5))
            .with_category(Category::Upsize, metrics(4.0, 2.0, 1.0, 3.0))];
        let all = CategorySelection::all();

        let revenue = svc.series(&rows, 1, MetricType::Revenue, &all);
        let offers = svc.series(&rows, 1, MetricType::Offers, &all);
        assert_eq!(revenue[0].value(Category::Upsell), Some(12.5));
        assert_eq!(offers[0].value(Category::Upsell), Some(20.0));

        let only_upsize = svc.series(&rows, 1, MetricType::Offers, &CategorySelection::single(Category::Upsize));
        assert_eq!(only_upsize[0].values.len(), 1);
    }

    #[test]
    fn invalidate_forces_recompute() {
        let mut svc = ChartService::new();
        let sel = CategorySelection::all();
        svc.series(&[revenue_row("2024-01-01", 1.0, 1.0, 1.0)], 1, MetricType::Revenue, &sel);
        svc.invalidate();
        let fresh = svc.series(&[revenue_row("2024-01-01", 4.0, 4.0, 4.0)], 1, MetricType::Revenue, &sel);
        assert_eq!(fresh[0].value(Category::Addon), Some(4.0));
    }
}
