use super::departments::{CodedLookup, CodedRecord};
use super::ApiClient;

pub type JobTitle = CodedRecord;

impl ApiClient {
    pub fn job_titles(&self) -> CodedLookup<'_> {
        CodedLookup {
            client: self,
            path: "/api/job-titles",
            noun: "job title",
            plural: "job titles",
        }
    }
}
