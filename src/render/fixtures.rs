//! Javadoc class pages in both supported layouts.

pub const MODERN_PAGE: &str = r##"<!DOCTYPE HTML>
<html lang="en"><head><title>Foo</title></head><body class="class-declaration-page">
<main role="main">
<div class="header">
<div class="sub-title"><span class="module-label-in-type">Module</span>&nbsp;<a href="../module-summary.html">acme.core</a></div>
<div class="sub-title"><span class="package-label-in-type">Package</span>&nbsp;<a href="package-summary.html">org.acme</a></div>
<h1 title="Class Foo" class="title">Class Foo</h1>
</div>
<div class="inheritance" title="Inheritance Tree"><a href="https://docs.oracle.com/en/java/javase/21/docs/api/java.base/java/lang/Object.html" class="external-link">java.lang.Object</a>
<div class="inheritance"><a href="Base.html">org.acme.Base</a>
<div class="inheritance">org.acme.Foo</div>
</div>
</div>
<section class="class-description" id="class-description">
<hr>
<div class="type-signature"><span class="modifiers">public class </span><span class="element-name type-name-label">Foo</span></div>
<div class="block">Foo coordinates   the <code>Bar</code>
 instances.</div>
</section>
<section class="summary">
<section class="method-summary" id="method-summary">
<h2>Method Summary</h2>
<div id="method-summary-table">
<div class="summary-table three-column-summary">
<div class="table-header col-first">Modifier and Type</div>
<div class="table-header col-second">Method</div>
<div class="table-header col-last">Description</div>
<div class="col-first even-row-color"><code>int</code></div>
<div class="col-second even-row-color"><code><a href="#size()" class="member-name-link">size</a>()</code></div>
<div class="col-last even-row-color">
<div class="block">Returns the number of bars.</div>
</div>
<div class="col-first odd-row-color"><code>static&nbsp;&lt;T&gt;&nbsp;Foo</code></div>
<div class="col-second odd-row-color"><code><a href="#of(T)" class="member-name-link">of</a>(T&nbsp;value)</code></div>
<div class="col-last odd-row-color"></div>
</div>
</div>
</section>
</section>
</main></body></html>"##;

pub const LEGACY_PAGE: &str = r##"<html><body>
<div class="header">
<div class="subTitle"><span class="packageLabelInType">Package</span>&nbsp;<a href="package-summary.html">org.acme</a></div>
<h2 title="Class Foo" class="title">Class Foo</h2>
</div>
<div class="contentContainer">
<ul class="inheritance">
<li>java.lang.Object</li>
<li>
<ul class="inheritance">
<li>org.acme.Foo</li>
</ul>
</li>
</ul>
<div class="description"><ul class="blockList"><li class="blockList">
<div class="block">Legacy foo.</div>
</li></ul></div>
<table class="memberSummary">
<tr><th class="colFirst" scope="col">Modifier and Type</th><th class="colSecond" scope="col">Method</th><th class="colLast" scope="col">Description</th></tr>
<tr class="altColor"><td class="colFirst"><code>void</code></td>
<th class="colSecond" scope="row"><code><span class="memberNameLink"><a href="#run()">run</a></span>()</code></th>
<td class="colLast"><div class="block">Runs it.</div></td></tr>
</table>
</div></body></html>"##;
