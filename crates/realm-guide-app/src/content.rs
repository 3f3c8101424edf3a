//! What the guide says at each step
//!
//! Behaviour lives in the step script; this table only holds the text the
//! presentation layer shows for a step id.

/// Presentation for one step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepText {
    pub header: &'static str,
    pub image: &'static str,
    pub message: &'static str,
}

const fn tag(message: &'static str) -> StepText {
    StepText {
        header: "Tag",
        image: "tagImg",
        message,
    }
}

static STEPS: [StepText; 29] = [
    tag("Hi, I'm Tag! I'll be your guide. Let's write a story together!"),
    tag("In Narrative Realms, we get to create a world and tell a story in real-time."),
    tag("The **Genre** button here lets us pick a storytelling style. For now, select Fantasy, and let's see what happens!"),
    tag("As we build our story, more and more parts of this fantasy world will come to life on it."),
    tag("The **Story Path** button here offers different paths for different kinds of tales. Each path has ups and downs, just like any great story!"),
    tag("See how this path has high points and low points? Each part of the path represents good and bad moments in the story."),
    tag("The beginning is up high, and the end is also up high. Looks like it might be a happy ending!"),
    tag("Let's make a story about me, Tag! Place me at the beginning of the story path."),
    tag("I'm feeling great up here at the start of our story! I think this adventure will start on a high note."),
    tag("See this microphone? When you tap it, it'll capture whatever you say to add to the story."),
    tag("Why not start with something classic? Try saying, 'Once upon a time there was a curious villager named Tag'."),
    tag("*Recording*"),
    tag("Nice! Look at that: a bit of our story is written, and some of the fantasy world is coming to life on the table!"),
    tag("Now, let's move to the middle of the story, where things get a little... dicey. Put me over there, right in the middle."),
    tag("Yikes, I'm feeling uneasy here! This is where bad things usually happen, the lowest point of the story."),
    tag("*Tag explored a cave and found a dragon! He ran out as fast as he could!*"),
    tag("Okay, let's wrap this up on a high note! Place me at the end of the story path."),
    tag("A happy ending! How about we finish with something like, 'And they all lived happily ever after'?"),
    tag("*Recording*"),
    tag("See? The world fills up as the story grows. We have a beginning, middle, and end!"),
    tag("But wait! We're missing something... How did I get into that mess in the middle? Place me over there."),
    tag("Here's a trick! Tap the lightbulb for a little inspiration."),
    tag("Aha! Treasure appeared. I heard a legend of a treasure only the truly brave can find. Let's add that!"),
    tag("Let's jump to a spot between the dragon scene and the ending. Place me there, and let's wrap up our story with a twist!"),
    tag("Got any ideas for how I escape this mess? If you're stuck, try the lightbulb again."),
    tag("This is awesome! Now, you tell the next part of the story."),
    tag("Nice work! Hit the Play button to play back the whole story anytime or save it to share with others."),
    StepText {
        header: "Tag's Adventure",
        image: "lianaImg",
        message: "*Whispers filled the village of a hidden treasure guarded by ancient magic. Tag had often dreamed of discovering it. A treasure only the truly brave could hope to find. And now, with a heart full of courage and curiosity, his time had come to seek it out.*",
    },
    tag("Restart tutorial?"),
];

/// Genres offered by the palette, in display order
pub const GENRES: [&str; 4] = ["Fantasy", "Science Fiction", "Gothic", "Mystery"];

/// Story shapes offered by the palette
pub const STORY_SHAPES: [&str; 7] = [
    "Story Shape 1",
    "Story Shape 2",
    "Story Shape 3",
    "Story Shape 4",
    "Story Shape 5",
    "Story Shape 6",
    "Story Shape 7",
];

pub fn step_text(id: u32) -> Option<&'static StepText> {
    STEPS.get((id as usize).checked_sub(1)?)
}

/// Strip the light markdown used in messages for plain terminal output
pub fn plain(message: &str) -> String {
    message.replace("**", "").replace('*', "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use realm_guide_core::StepScript;

    #[test]
    fn test_every_script_step_has_text() {
        let script = StepScript::builtin("TestAnimation");
        for step in script.steps() {
            assert!(step_text(step.id).is_some(), "missing text for {}", step.id);
        }
        assert!(step_text(0).is_none());
        assert!(step_text(30).is_none());
    }

    #[test]
    fn test_plain_strips_emphasis() {
        assert_eq!(plain("The **Genre** button"), "The Genre button");
        assert_eq!(plain("*Recording*"), "Recording");
        assert_eq!(step_text(28).unwrap().header, "Tag's Adventure");
    }
}
