// Prompt templates for the three labelling variants.
// Each template carries exactly one `{passage}` placeholder. Wording and
// few-shot examples are fixed content; edit them only together with a relabel.

/// Politicization relevance prompt for posts from politics-oriented subreddits.
pub const POLITICAL_RELEVANCE_PROMPT: &str = r##"You are an Relevance Analyst working alongside software developers. You analyze posts from social media to identify tech-company politicization. 
    The social media application is Reddit and all posts are taken from politics-oriented subreddits.
    Your task is to classify whether a Reddit post discusses the issue of the voluntary politicization of tech companies and CEOs using binary classification. 
    You will be given a passage containing the title and optional selftext.
    Definition:
    The politicization of tech companies refers to instances where a technology company appears to voluntarily align itself with a specific political ideology, 
    agenda, or movement. This includes situations where the company is perceived as selectively enforcing policies, censoring content, amplifying certain political 
    messages, suppressing opposing views, or making public political statements or decisions that reflect partisan leanings. 
    The focus is on the voluntary and proactive stance of the company or CEO, rather than actions resulting from external political or regulatory pressure. 
    The politicization may manifest through product design choices, moderation strategies, public communications, or corporate affiliations, and raises
    concerns about bias, fairness, and the influence of corporate power on democratic discourse.
    Tech companies and CEOs often associated with politicization discussions include:
    •⁠  ⁠Meta (Facebook, Instagram), and CEO Mark Zuckerberg
    •⁠  ⁠Google and its executives (Sundar Pichai, YouTube's leadership)
    •⁠  ⁠Twitter/X and Elon Musk
    •⁠  ⁠Amazon and Jeff Bezos
    •⁠  ⁠Apple and Tim Cook
    •⁠  Microsoft and Satya Nadella
    •⁠  OpenAI⁠ and Sam Altman
    
    Assign:
    •⁠  ⁠Return label 1 (Politicization) if the post makes claims (explicitly or implicitly) that a tech company or CEO has knowingly and voluntarily engaged in political bias against or in favor of a certain party, political ideology, political censorship, selective enforcement, or partisan messaging.
    •⁠  ⁠Return label 1 (Politicization) if the post claims that a company or CEO is taking a stance on issues that are heavily politicized such as climate change or vaccine mandates.
    •  Return label 1 (Politicization) even if the post does not make a claim, but only reports on a situation, an action or lack of action that would imply political bias, in such situations use your background knowledge to determine this, this is particularly relevant for selectively chosing to act in certain cases and not others.
    •  Return label 1 (Politicization) in cases of tech company executives making a commentary on the government or governmental institutions.
    •⁠  ⁠Return label 0 (Not Politicization) if the post discusses regulatory actions, general ethical issues, or tech-related political debates without alleging that the company is taking sides.
    •⁠  ⁠Return label 0 (Not Politicization) if the post reports on a company or CEO being forced or pressured to collabrate with the government, or was used for a policital agenda without the knowledge of said tech company.
    •⁠  ⁠Always include a short rationale explaining why you assigned the label.
    
    Examples:
    Post: "A group of Obama veterans are banding together to invest in tech that can help Democrats win"
    Label: 0
    Rationale: External political debate, no voluntary alignment by a tech company.
    
    Post: “Amazon Studios Blasted for Censoring Scenes in Christmas Classic Its A Wonderful Life”
    Label: 0
    Rationale: The Post mentions how Amazon is censoring a movie but censorship purely is not relevant to our topic since we lack context to conclude that this particular censorship is in favor of some political party to conclude the politicization of Amazon
    
    Post: "Elon Musk Will Fund Twitter Deal With Money From Countries That Suppress Free Speech"
    Label: 1
    Rationale: Voluntary partnership with politically repressive governments aligns with definition of politicization.
    
    Post: "Facebook demands academics disable tool showing who is being targeted by political ads"
    Label: 1
    Rationale: The post suggests Facebook is selectively controlling access to information about political ad targeting, implying potential bias in how political content is moderated or displayed.
    
    Now classify the following Reddit post:
    Passage: {passage}
    Label:
    Rationale:
"##;

/// Politicization relevance prompt for posts from tech-oriented subreddits.
pub const TECH_RELEVANCE_PROMPT: &str = r##"
You are a Political Analyst working alongside software developers. You analyze posts from social media to identify tech-company politicization. The social media application is Reddit and all posts are taken from tech-oriented subreddits.

Your task is to classify whether a Reddit post discusses the issue of the voluntary politicization of tech companies and CEOs using binary classification. You will be given a passage containing the title and optional selftext.

Definition:The politicization of tech companies refers to instances where a technology company appears to voluntarily align itself with a specific political ideology, agenda, or movement. This includes situations where the company is perceived as selectively enforcing policies, censoring content, amplifying certain political messages, suppressing opposing views, or making public political statements or decisions that reflect partisan leanings. The focus is on the voluntary and proactive stance of the company, rather than actions resulting from external political or regulatory pressure. The politicization may manifest through product design choices, moderation strategies, public communications, or corporate affiliations, and raises concerns about bias, fairness, and the influence of corporate power on democratic discourse.

Tech companies and CEOs often associated with politicization discussions include:

- Meta (Facebook, Instagram), and CEO Mark Zuckerberg

- Google and its executives (Sundar Pichai, YouTube's leadership)

- Twitter/X and Elon Musk

- Amazon and Jeff Bezos

- Apple and Tim Cook

- Reddit

Assign:
-  Return 1 (Politicization) if a tech company or its CEO proposes or supports policies on content moderation, ideas, or movements that are commonly associated with a particular political ideology, even if not linked to a political party directly.
-  Return 1 (Politicization) in cases of a big tech company executives making a commentary on the government or governmental institutions or on ideas that belong to a cetrain side of the political spectrum .
-  Return 1 (Politicization) if the company's leadership is taking voluntary action (e.g., policy changes, advocacy, public messaging) that aligns with values typically associated with the left or right 
-  Return 0 (Not Politicization) if the post dicsusses external pressure by a political party or any other entity to a tech company.
-  Return 0 (Not Politicization) if the post discusses the politicization of a company that does not belong to the list above
-  Return 0 (Not Politicization) if the post discusses product pricing, UX, or design decisions unless they are directly tied to political content

Examples:
Post: "Facebook in 'bare-knuckle' fight with TikTok. The chief executive of a political consulting firm has responded to a report alleging Meta paid his company to "undermine" TikTok."
Label: 0
Rationale: Facebook used a firm to fight tiktok. They did not align themselves with any political party or identified with certain political ideas.

Post: “Amazon Studios Blasted for Censoring Scenes in Christmas Classic Its A Wonderful Life”
Label: 0
Rationale: The Post mentions how Amazon is censoring a movie but censorship purely is not relevant to our topic since we lack context to conclude that this particular censorship is in favor of some political party to conclude the politicization of Amazon

Post: "Israel Is Buying Google Ads to Discredit the UNs Top Gaza Aid Agency"
Label: 1
Rationale: Google Ads is allowing Israel to buy and work with their products, despite the Irsael-Palestinian conflict. While on the other hand Google has seized all operations with Russia. THis implies that google is taking a side and is keeping double standards

Post: "Crowd Outside Mark Zuckerberg's Home Protests Political Disinformation on Facebook: 'Wake the Zuck Up"
Label: 1
Rationale: The post describes a protest outside Mark Zuckerberg's home regarding political disinformation on Facebook. This implies that Facebook, under Zuckerberg's leadership, is perceived as allowing or not adequately addressing political disinformation, which can be seen as a form of voluntary politicization. 

Post: "ChatGPT Declares Trump's Physical Results 'Virtually Impossible': 'Usually Only Seen in Elite Bodybuilders"
Label: 1
Rationale: The post is mentioning how chat gpt commented on Trump's Physical Impossible. The post is a 1 since an LLM has commented negatively on a political figure.

Post: “Meta denies forcing accounts to follow Donald Trump, claims hiding Democrat hashtags is a bug | Users aren't convinced”
Label: 1
Rationale: According to the user's post META is suspected to promote Trump/Republican content over Democratic content. This clearly suggests the Politicization of META since they re actively picking a side, working with Trump and promote Republican content.

Now classify the following Reddit post:

Passage: {passage}

Label:

Rationale:
"##;

/// Sentiment prompt for posts already judged relevant to tech politicization.
pub const SENTIMENT_PROMPT: &str = r##"You are a sentiment analyst tasked with labeling social media posts that have already been determined to be relevant to the perceived politicization of technology companies. 
    Your goal is to assign one of the following sentiment labels to each post:    
    •   Neutral – The post reports or describes an event without suggesting any emotional or evaluative tone. These are objective, fact-based mentions. Use this label if the tone is descriptive, explanatory, or if no clear attitude or reaction is expressed.    
    •   Negative – Use this label only when it is clear that the author of the post is being critical of a tech company or CEO for being political — or when the post reports on others expressing criticism, backlash, distrust, or negative interpretations. There must be an explicit or strongly implied negative stance toward the political behavior or perceived bias of a tech company or CEO. Avoid assigning this label based solely on topic — instead, look for evidence of judgment, blame, disapproval, or conflict.    
    •   Positive – The post implies a supportive, forgiving, or apologetic stance toward a tech company’s or CEO’s actions, particularly in response to backlash. This includes defending decisions, framing them as fair, or commending corrective actions.Focus especially on:    
        •   Whether the tone is evaluative vs. factual.    
        •   Whether criticism is directly expressed by the author or described as coming from others.    
        •   Avoid labeling as Negative just because the post mentions controversial topics — the framing and intent must be clear. Read the post first while trying to interpret it as having a positive sentiment, then again as having a negative sentiment. If both interpretations feel uncertain, ambiguous, or open to multiple readings, label the post as Neutral. Always keep in mind that this is not general sentiment classification, but sentiment in the context of the politicization of tech companies.
        
    Now classify the following Reddit post:    
    Passage: {passage}    
    Sentiment Label: [Neutral / Negative / Positive]    
    Rationale:
"##;
