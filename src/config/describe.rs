use crate::config::FieldPath;

/// Help text for well-known bot configuration keys, by full dotted path.
const DESCRIPTIONS: &[(&str, &str)] = &[
    ("discord_user_token", "Your Discord user token for authentication"),
    ("gemini_api_key", "Google Gemini API key for AI responses"),
    ("channel_ids", "List of channel IDs the bot will monitor (one per line)"),
    ("persona.name", "Name of your bot persona"),
    ("persona.style", "Bot's communication style (e.g., casual, formal)"),
    ("persona.quirks", "Bot's personality quirks and traits"),
    ("persona.boundaries", "Bot's behavioral boundaries and restrictions"),
    ("persona.mood_daily_drift", "Amount mood can drift per day (0..1)"),
    ("persona.moods", "List of possible moods for the bot (one per line)"),
    ("persona.mood_change_probability", "Chance to change mood after a reply"),
    ("reply.max_reply_chars", "Maximum characters in a reply"),
    ("reply.min_delay_sec", "Minimum delay before replying (seconds)"),
    ("reply.max_delay_sec", "Maximum delay before replying (seconds)"),
    ("reply.typing_speed_wpm", "Typing speed in words per minute"),
    ("reply.multi_msg_probability", "Chance to split into 2-3 short messages"),
    ("reply.outside_hours_reply_prob", "Reply probability outside active hours"),
    ("reply.public_probs.stranger", "Reply chance for strangers (score 0-10)"),
    ("reply.public_probs.acquaintance", "Reply chance for acquaintances (score 11-50)"),
    ("reply.public_probs.friend", "Reply chance for friends (score 51-100)"),
    ("reply.public_probs.bestfriend", "Reply chance for best friends (score 101+)"),
    ("reply.mention_boost", "Boost when user mentions you or says your name"),
    ("friendship.start_score", "Starting friendship score"),
    ("friendship.direct_mention_boost", "Boost for direct mentions"),
    ("friendship.long_chat_boost", "Boost for long conversations"),
    ("friendship.positive_boost", "Boost for positive interactions"),
    ("friendship.fact_share_boost", "Boost for sharing facts"),
    ("friendship.negative_penalty", "Penalty for negative interactions"),
    ("friendship.weekly_decay", "Weekly decay of friendship score"),
    ("friendship.friend_threshold", "Score needed to be considered a friend"),
    ("friendship.bestfriend_threshold", "Score needed to be considered a best friend"),
    ("friendship.max_abs_score_change_per_day", "Maximum score change per day"),
    ("memory.max_history_per_channel", "Maximum messages to remember per channel"),
    ("memory.enable_fact_learning", "Enable learning facts about users"),
    ("memory.topic_track_max", "Maximum topics to track"),
    ("memory.fact_decay_days", "Days before facts expire"),
    ("memory.recall_probability", "Probability of recalling facts"),
    ("mirror.enable", "Enable style mirroring"),
    ("mirror.weight_lowercase", "How much to mirror lowercase style"),
    ("mirror.weight_emoji", "How much to mirror emoji usage"),
    ("mirror.weight_length", "How much to mirror message length"),
    ("filters.blocked_user_ids", "List of user IDs to block (one per line)"),
    ("filters.blocked_keywords", "List of keywords to block (one per line)"),
    (
        "filters.require_keyword_any",
        "Only reply when any of these keywords are present (one per line)",
    ),
    ("filters.keywords_priority", "Keywords that raise reply priority (one per line)"),
    ("emoji.reply_emojis", "Emojis to use in reactions (one per line)"),
    ("emoji.reaction_probability", "Probability of reacting with emojis"),
    ("emoji.reaction_window_seconds", "Time window for emoji reactions"),
    ("active_hours.start_hour", "Start of bot's active hours (24-hour format)"),
    ("active_hours.end_hour", "End of bot's active hours (24-hour format)"),
    ("self_start.enabled", "Enable self-starting conversations"),
    ("self_start.min_idle_seconds", "Minimum idle time before self-starting"),
    ("self_start.chance", "Probability of self-starting a conversation"),
    ("self_start.openers", "Opening lines for self-started conversations (one per line)"),
    ("rate_limit.max_per_channel_per_hour", "Maximum messages per channel per hour"),
    ("rate_limit.per_user_cooldown_s", "Cooldown time per user (seconds)"),
    ("storage.debug_log_file", "File name for debug logs"),
    ("storage.ai_log_file", "File name for AI interaction logs"),
    ("storage.db_file", "Database file name for storing bot data"),
    ("fact_rules", "Fact extraction rules, one `pattern = category` per line"),
];

pub fn field_description(path: &FieldPath) -> Option<&'static str> {
    let key = path.to_string();
    DESCRIPTIONS
        .iter()
        .find(|(p, _)| *p == key)
        .map(|(_, desc)| *desc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn known_paths_have_help_text() {
        assert_eq!(
            field_description(&FieldPath::parse("reply.public_probs.friend")),
            Some("Reply chance for friends (score 51-100)")
        );
        assert_eq!(field_description(&FieldPath::parse("persona")), None);
        assert_eq!(field_description(&FieldPath::parse("custom.knob")), None);
    }
}
