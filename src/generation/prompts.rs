use serde::Serialize;
use serde_json::Value;

use crate::campaign::{Campaign, CreativePersona};
use crate::product::Product;
use crate::user::UserProfile;

pub const PERSONA_SYSTEM_PROMPT: &str = "You are a senior creative strategist for short-form \
video advertising. Study the viewer profile and the product, then define the creative \
direction for an ad aimed at that viewer. Reply with a single JSON object and nothing else.";

pub const SCENE_SYSTEM_PROMPT: &str = "You are a film director who writes prompts for \
text-to-video models. Turn the creative direction you are given into a vivid, concrete \
description of the finished video.";

/// The keys the persona reply is asked to contain.
pub const PERSONA_KEYS: [&str; 8] = [
    "protagonist_description",
    "setting",
    "mood_and_tone",
    "narrative_arc",
    "camera_behavior",
    "lighting",
    "music_vibe",
    "pacing",
];

const UNKNOWN: &str = "Unknown";

fn render_optional<T: Serialize>(set: &Option<T>) -> String {
    match set {
        Some(set) => serde_json::to_string_pretty(set).unwrap_or_else(|_| UNKNOWN.to_string()),
        None => UNKNOWN.to_string(),
    }
}

pub fn persona_brief(user: &UserProfile, product: &Product, campaign: &Campaign) -> String {
    let features = if product.features.is_empty() {
        "none listed".to_string()
    } else {
        product.features.join(", ")
    };

    let product_intent = if campaign.product_intent.is_empty() {
        UNKNOWN.to_string()
    } else {
        Value::from_iter(
            campaign
                .product_intent
                .iter()
                .map(|(key, value)| (key.clone(), Value::String(value.clone()))),
        )
        .to_string()
    };

    format!(
        "VIEWER PROFILE\n\
         Name: {name}\n\
         Demographics: {demographics}\n\
         Psychographics: {psychographics}\n\
         Lifestyle: {lifestyle}\n\
         Media preferences: {media_preferences}\n\
         \n\
         PRODUCT\n\
         Name: {product_name}\n\
         Description: {description}\n\
         Features: {features}\n\
         \n\
         CAMPAIGN\n\
         Objective: {objective}\n\
         Platform: {platform}\n\
         Duration: {duration} seconds\n\
         Product intent: {product_intent}\n\
         \n\
         Return a JSON object with exactly these keys:\n\
         - protagonist_description: who appears on screen and how they look\n\
         - setting: where the ad takes place\n\
         - mood_and_tone: the emotional register\n\
         - narrative_arc: an object with act_1, act_2 and act_3\n\
         - camera_behavior: framing and movement\n\
         - lighting: the quality and color of light\n\
         - music_vibe: the soundtrack feel\n\
         - pacing: how fast the edit moves\n",
        name = user.name,
        demographics = render_optional(&user.demographics),
        psychographics = render_optional(&user.psychographics),
        lifestyle = render_optional(&user.lifestyle),
        media_preferences = render_optional(&user.media_preferences),
        product_name = product.name,
        description = product.description,
        features = features,
        objective = campaign.objective,
        platform = campaign.platform,
        duration = campaign.duration_seconds,
        product_intent = product_intent,
    )
}

pub fn scene_request(persona: &CreativePersona, duration_seconds: i32) -> String {
    format!(
        "CREATIVE DIRECTION\n\
         {persona:#}\n\
         \n\
         Write the final video prompt as one cohesive paragraph that describes a \
         {duration_seconds} second ad shot by shot. Cover lighting, texture, camera \
         movement and what the subject does.",
        persona = Value::Object(persona.clone()),
    )
}
