// ABOUTME: Library half of the choreboard CLI: template loading and text rendering
// ABOUTME: Kept separate from the binary so the formatting can be unit tested

pub mod output;
pub mod template;
