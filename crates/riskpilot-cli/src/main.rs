//! RiskPilot CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # 거래 기록 재생 후 파라미터 적응 (경보 수준 high)
//! riskpilot adapt -s BTC/USDT --trades data/trades.json --prices data/prices.json --alert high
//!
//! # 1년 포트폴리오 투영 + Monte Carlo 요약
//! riskpilot project --initial 10000 --annual-return 0.10 --volatility 0.30 --horizon 1y --monte-carlo
//!
//! # 리스크 점수
//! riskpilot score --allocations 0.5,0.3,0.2 --snapshot data/snapshot.json
//!
//! # 가치 시계열 지표
//! riskpilot metrics --values data/equity.json
//! ```

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use riskpilot_analytics::PortfolioProjector;
use riskpilot_core::{
    init_logging, AlertLevel, AppConfig, LogConfig, LogFormat, ProjectionScenario,
    SnapshotMetrics,
};
use riskpilot_risk::AdaptiveRiskConfig;
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

use riskpilot_cli::commands::adapt::{run_adapt, AdaptConfig};
use riskpilot_cli::commands::metrics::run_metrics;
use riskpilot_cli::commands::project::{parse_horizon, run_project, ProjectConfig};
use riskpilot_cli::commands::read_json;
use riskpilot_cli::commands::score::{parse_allocations, run_score};

#[derive(Parser)]
#[command(name = "riskpilot")]
#[command(about = "RiskPilot - 적응형 리스크 파라미터 및 포트폴리오 분석 도구", long_about = None)]
#[command(version)]
struct Cli {
    /// 설정 파일 (없으면 기본값)
    #[arg(short, long, global = true, default_value = "config/riskpilot.toml")]
    config: PathBuf,

    /// 로그 형식 덮어쓰기 (pretty, json, compact)
    #[arg(long, global = true)]
    log_format: Option<String>,

    /// 적응 span 생성/종료 이벤트 출력
    #[arg(long, global = true, default_value = "false")]
    log_spans: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 거래 기록을 재생하고 리스크 파라미터를 적응
    Adapt {
        /// 심볼 (예: BTC/USDT)
        #[arg(short, long, default_value = "DEFAULT")]
        symbol: String,

        /// 거래 결과 JSON 배열 파일
        #[arg(short, long)]
        trades: PathBuf,

        /// 최근 가격 JSON 배열 파일
        #[arg(short, long)]
        prices: Option<PathBuf>,

        /// 복원할 상태 파일
        #[arg(long)]
        state: Option<PathBuf>,

        /// 결과 상태 저장 경로
        #[arg(long)]
        save_state: Option<PathBuf>,

        /// 경보 수준 (none, low, medium, high, critical)
        #[arg(short, long, default_value = "none")]
        alert: String,

        /// 설정 프리셋 (default, conservative, aggressive)
        #[arg(long, default_value = "default")]
        profile: String,

        /// 최적화를 블로킹 스레드에서 실행
        #[arg(long, default_value = "false")]
        detached: bool,
    },

    /// 포트폴리오 가치 투영
    Project {
        /// 초기 가치
        #[arg(long)]
        initial: f64,

        /// 연율 기대 수익률 (0.10 = 10%)
        #[arg(long)]
        annual_return: f64,

        /// 연율 변동성 (0.30 = 30%)
        #[arg(long)]
        volatility: f64,

        /// 기간 (예: 365d, 12w, 6m, 2y)
        #[arg(long, default_value = "1y")]
        horizon: String,

        /// 정기 적립 금액
        #[arg(long)]
        contribution: Option<f64>,

        /// 적립 주기 (일)
        #[arg(long, default_value = "30")]
        every_days: u32,

        /// 시드 (기본: 설정값)
        #[arg(long)]
        seed: Option<u64>,

        /// Monte Carlo 요약 포함
        #[arg(long, default_value = "false")]
        monte_carlo: bool,

        /// 일별 경로 전체 출력
        #[arg(long, default_value = "false")]
        full_paths: bool,
    },

    /// 포트폴리오 리스크 점수
    Score {
        /// 쉼표로 구분된 비중 (합계 1)
        #[arg(short, long)]
        allocations: String,

        /// 스냅샷 지표 JSON 파일
        #[arg(long)]
        snapshot: Option<PathBuf>,
    },

    /// 가치 시계열에서 스냅샷 지표 계산
    Metrics {
        /// 가치 시계열 JSON 배열 파일
        #[arg(short, long)]
        values: PathBuf,

        /// 연율 무위험 이자율 (기본: 설정값)
        #[arg(long)]
        risk_free_rate: Option<f64>,
    },
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn risk_profile(name: &str, app: &AppConfig) -> Result<AdaptiveRiskConfig> {
    match name.to_lowercase().as_str() {
        "default" => Ok(AdaptiveRiskConfig::from_settings(&app.risk)),
        "conservative" => Ok(AdaptiveRiskConfig::conservative()),
        "aggressive" => Ok(AdaptiveRiskConfig::aggressive()),
        other => Err(anyhow!(
            "Invalid profile: {other}. Use: default, conservative, aggressive"
        )),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let app = AppConfig::load(&cli.config)
        .with_context(|| format!("Failed to load config {}", cli.config.display()))?;

    // 트레이싱 초기화
    let mut log_config = LogConfig::from(&app.logging);
    if let Some(format) = &cli.log_format {
        log_config = log_config.with_format(format.parse::<LogFormat>()?);
    }
    if cli.log_spans {
        log_config = log_config.with_span_events(true);
    }
    init_logging(log_config).context("Failed to initialize logging")?;

    match cli.command {
        Commands::Adapt {
            symbol,
            trades,
            prices,
            state,
            save_state,
            alert,
            profile,
            detached,
        } => {
            let alert: AlertLevel = alert.parse()?;
            let risk = risk_profile(&profile, &app)?;

            let summary = run_adapt(
                AdaptConfig {
                    symbol,
                    trades_path: trades,
                    prices_path: prices,
                    state_path: state,
                    save_state,
                    alert,
                    detached,
                },
                risk,
            )
            .await?;
            print_json(&summary)?;
        }

        Commands::Project {
            initial,
            annual_return,
            volatility,
            horizon,
            contribution,
            every_days,
            seed,
            monte_carlo,
            full_paths,
        } => {
            let horizon = parse_horizon(&horizon)?;
            let mut scenario = ProjectionScenario::new(initial, annual_return, volatility, horizon);
            if let Some(amount) = contribution {
                scenario = scenario.with_contribution(amount, every_days);
            }

            let projector = PortfolioProjector::new(app.projection.clone());
            let report = run_project(
                ProjectConfig {
                    scenario,
                    seed,
                    monte_carlo,
                    full_paths,
                },
                &projector,
            )?;
            info!(
                expected = report.projection.expected_terminal,
                days = report.projection.days,
                "투영 완료"
            );
            print_json(&report)?;
        }

        Commands::Score {
            allocations,
            snapshot,
        } => {
            let allocations = parse_allocations(&allocations)?;
            let snapshot: SnapshotMetrics = match snapshot {
                Some(path) => read_json(path)?,
                None => Default::default(),
            };
            print_json(&run_score(&allocations, &snapshot)?)?;
        }

        Commands::Metrics {
            values,
            risk_free_rate,
        } => {
            let rate = risk_free_rate.unwrap_or(app.projection.risk_free_rate);
            print_json(&run_metrics(&values, rate)?)?;
        }
    }

    Ok(())
}
