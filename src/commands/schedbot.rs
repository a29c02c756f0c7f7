use crate::agent::help_text;
use crate::commands::{create_success_embed, resolve_agent, CommandResult, Context};

/// Discord message length limit, in characters
pub const DISCORD_MESSAGE_LIMIT: usize = 2000;

/// Natural-language scheduling, plus the help, clear and stats keywords
#[poise::command(slash_command, prefix_command)]
pub async fn schedbot(
    ctx: Context<'_>,
    #[description = "A scheduling request, or help / clear / stats"]
    #[rest]
    request: String,
) -> CommandResult {
    let user_id = ctx.author().id.to_string();

    match request.trim() {
        "help" => {
            let prefix = {
                let config_read = ctx.data().config.read().await;
                config_read.bot_prefix.clone()
            };
            ctx.send(
                poise::CreateReply::default()
                    .embed(create_success_embed("🤖 Bot Help", &help_text(&prefix))),
            )
            .await?;
        }
        "clear" => {
            let agent = resolve_agent(&ctx).await;
            let reply = agent.clear_history(&user_id).await?;
            ctx.say(reply).await?;
        }
        "stats" => {
            let agent = resolve_agent(&ctx).await;
            let stats = agent.stats().await?;
            ctx.send(
                poise::CreateReply::default()
                    .embed(create_success_embed("📊 Bot Statistics", &stats)),
            )
            .await?;
        }
        _ => {
            // Acknowledge right away; the model call can take a few seconds
            ctx.defer().await?;

            let agent = resolve_agent(&ctx).await;
            let reply = agent.handle_message(&user_id, &request).await?;

            for chunk in split_message(&reply, DISCORD_MESSAGE_LIMIT) {
                ctx.say(chunk).await?;
            }
        }
    }

    Ok(())
}

/// Split a reply into chunks that fit Discord's message length limit
pub fn split_message(text: &str, limit: usize) -> Vec<String> {
    if text.chars().count() <= limit {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut count = 0;

    for ch in text.chars() {
        current.push(ch);
        count += 1;
        if count == limit {
            chunks.push(std::mem::take(&mut current));
            count = 0;
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_message_is_one_chunk() {
        let chunks = split_message("hello", 2000);
        assert_eq!(chunks, vec!["hello".to_string()]);
    }

    #[test]
    fn test_long_message_is_split() {
        let text = "a".repeat(4500);
        let chunks = split_message(&text, 2000);

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].len(), 2000);
        assert_eq!(chunks[1].len(), 2000);
        assert_eq!(chunks[2].len(), 500);
    }

    #[test]
    fn test_exact_limit_is_one_chunk() {
        let text = "a".repeat(2000);
        let chunks = split_message(&text, 2000);
        assert_eq!(chunks.len(), 1);
    }

    #[test]
    fn test_split_respects_char_boundaries() {
        // Multi-byte characters must not be cut in half
        let text = "ä".repeat(5);
        let chunks = split_message(&text, 2);

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0], "ää");
        assert_eq!(chunks[2], "ä");
    }
}
