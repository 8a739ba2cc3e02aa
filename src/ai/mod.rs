pub mod ollama;
pub mod streaming;

pub use ollama::OllamaClient;
pub use streaming::ModelAnswer;

/// Instruction sent with every frame. Answers are expected to open with the category number.
pub const ACTIVITY_PROMPT: &str = "Look at this image and classify what the person is doing. Choose ONE of these categories:

1. Using phone - actively HOLDING/USING a smartphone in their hands, looking at it
2. Working - using computer/laptop/keyboard, at desk working
3. Using phone while working - doing BOTH: person is ACTIVELY HOLDING and USING phone in their hand AND working at computer/desk
4. Sleeping - eyes closed, lying down, resting in bed
5. Eating - consuming food, holding utensils or food items
6. Drinking - holding cup/glass/bottle, drinking beverages
7. Other - anything else

CRITICAL RULES:
- For categories 1 or 3: Person MUST be ACTIVELY HOLDING the phone in their hand(s)
- If phone is just sitting on desk/table (not in hands), DO NOT choose 1 or 3
- If phone is nearby but person is not holding it, choose category 2 (Working) or 7 (Other)
- Look at their HANDS specifically - are they gripping/holding a phone right now?
- Category 3 requires BOTH: phone in hand AND computer/desk visible

First state the category number (1-7), then briefly explain what you see, specifically mentioning if phone is in hands or just on desk.";
