use anyhow::Result;

use crate::assistant::Assistant;
use crate::config::Settings;

pub async fn run_status(settings: &Settings, assistant: &Assistant) -> Result<()> {
    if settings.api_token.is_some() {
        println!("✅ API token configured");
    } else {
        println!("❌ No API token configured");
        println!("   Set CODEASSIST_API_TOKEN or HF_API_TOKEN to use hosted models.");
    }

    println!("   StarCoder: {}", settings.endpoints.starcoder);
    println!("   CodeLLaMA: {}", settings.endpoints.codellama);

    if assistant.orchestrator().has_local_backend() {
        println!(
            "✅ Local model available: {}",
            settings.local_model_path.display()
        );
    } else {
        println!(
            "⚠️  Local model not found at {}",
            settings.local_model_path.display()
        );
        println!("   Offline mode and fallback are disabled.");
    }

    let orchestrator = assistant.orchestrator();
    let config = orchestrator.config();
    println!(
        "   Token counting: {}",
        if orchestrator.budgeter().is_exact() {
            "tokenizer"
        } else {
            "heuristic (4 chars per token)"
        }
    );
    println!(
        "   Limits: {} input tokens, {} total tokens, {} attempts",
        config.input_tokens, config.max_total_tokens, config.max_attempts
    );

    Ok(())
}
