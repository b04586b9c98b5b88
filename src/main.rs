use bookpress::{BookBuilder, BookConfig, BuildMode, BuildReport, Result, discover_chapters};
use clap::Parser;
use std::path::PathBuf;
use std::process;

/// 📚 BookPress - HTML章节转EPUB工具
#[derive(Parser)]
#[command(name = "bookpress")]
#[command(about = "把目录中的HTML章节组装为一本EPUB电子书")]
#[command(version)]
struct Args {
    /// 所有章节合并为一个内容文档
    #[arg(long, help = "生成单页EPUB（所有章节合并为一个文档）")]
    single_page: bool,

    /// 指定要处理的文件
    #[arg(long, num_args = 1.., value_name = "PATTERN", help = "要处理的HTML文件（支持通配符，相对书籍目录）；不指定时自动发现")]
    files: Vec<String>,

    /// 配置文件路径
    #[arg(short, long, default_value = bookpress::config::DEFAULT_CONFIG_PATH, help = "YAML配置文件路径，不存在时使用默认配置")]
    config: PathBuf,

    /// 生成默认配置文件
    #[arg(long, help = "把默认配置写入 --config 指定的路径后退出")]
    init_config: bool,

    /// HTML章节目录
    #[arg(long, help = "HTML章节所在目录（覆盖配置文件）")]
    book_dir: Option<PathBuf>,

    /// 输出文件
    #[arg(short, long, help = "EPUB输出路径（覆盖配置文件）")]
    output: Option<PathBuf>,

    /// 日志级别
    #[arg(short, long, action = clap::ArgAction::Count, help = "显示更多日志（-v 信息, -vv 调试）")]
    verbose: u8,
}

fn main() {
    let args = Args::parse();

    let level = match args.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if args.init_config {
        match BookConfig::generate_default_config(&args.config) {
            Ok(()) => println!("📝 默认配置已写入: {}", args.config.display()),
            Err(e) => {
                eprintln!("❌ 错误: {}", e);
                process::exit(1);
            }
        }
        return;
    }

    match run(&args) {
        Ok((report, max_errors)) => print_summary(&report, max_errors, args.verbose > 0),
        Err(e) => {
            eprintln!("❌ 错误: {}", e);
            process::exit(1);
        }
    }
}

fn run(args: &Args) -> Result<(BuildReport, usize)> {
    let mut config = BookConfig::load_or_default(&args.config)?;
    if let Some(book_dir) = &args.book_dir {
        config.source.book_dir = book_dir.clone();
    }
    if let Some(output) = &args.output {
        config.output.epub_file = output.clone();
    }

    let mode = BuildMode::from_single_page(args.single_page);
    println!("📚 创建EPUB: {} ({}模式)", config.book.title, mode.label());

    if args.files.is_empty() {
        println!("🔍 自动发现 {} 中的HTML文件...", config.source.book_dir.display());
    } else {
        println!("🔍 使用指定的文件...");
    }
    let sources = discover_chapters(&config.source, &args.files)?;
    println!("  共找到 {} 个文件", sources.len());

    let max_errors = config.report.max_errors;
    let builder = BookBuilder::new(config)?;
    let report = builder.build(&sources, mode)?;
    Ok((report, max_errors))
}

fn print_summary(report: &BuildReport, max_errors: usize, verbose: bool) {
    let stats = &report.stats;

    println!("\n{}", "=".repeat(50));
    println!("📊 EPUB创建汇总");
    println!("{}", "=".repeat(50));
    println!("  模式: {}", report.mode.label());
    println!("  处理章节: {}", stats.chapters);
    println!("  发现图片: {}", stats.images_found);
    println!("  下载图片: {}", stats.images_downloaded);
    println!("  下载失败: {}", stats.images_failed);
    if stats.image_collisions > 0 {
        println!("  文件名冲突: {}", stats.image_collisions);
    }
    println!("  EPUB大小: {:.2} MB", report.epub_size_mb());

    if verbose {
        println!("\n📖 章节:");
        for chapter in &report.chapters {
            println!("  {}. {} ({})", chapter.ordinal, chapter.title, chapter.source_filename);
        }
    }

    if stats.has_errors() {
        println!("\n⚠️  遇到 {} 个错误:", stats.errors.len());
        for line in stats.error_summary(max_errors) {
            println!("  - {}", line);
        }
    }

    println!("\n🎉 EPUB文件创建完成！");
    println!("  位置: {}", report.epub_path.display());
}
